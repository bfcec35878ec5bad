use crate::model::{ClassRecord, StudentRecord, Teacher, TeacherId};
use std::collections::HashSet;

/// The three collections the roster screen works against. Writes always
/// hand over a whole new collection; nothing is patched in place.
pub trait RosterStore {
    fn teachers(&self) -> &[Teacher];
    fn classes(&self) -> &[ClassRecord];
    fn students(&self) -> &[StudentRecord];

    fn replace_teachers(&mut self, next: Vec<Teacher>);
    fn replace_classes(&mut self, next: Vec<ClassRecord>);
    fn replace_students(&mut self, next: Vec<StudentRecord>);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    teachers: Vec<Teacher>,
    classes: Vec<ClassRecord>,
    students: Vec<StudentRecord>,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every replace, whichever collection it touched.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl RosterStore for MemoryStore {
    fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    fn replace_teachers(&mut self, next: Vec<Teacher>) {
        self.teachers = next;
        self.revision += 1;
    }

    fn replace_classes(&mut self, next: Vec<ClassRecord>) {
        self.classes = next;
        self.revision += 1;
    }

    fn replace_students(&mut self, next: Vec<StudentRecord>) {
        self.students = next;
        self.revision += 1;
    }
}

/// First id that appears more than once, if any.
pub fn find_duplicate_id(teachers: &[Teacher]) -> Option<TeacherId> {
    let mut seen: HashSet<TeacherId> = HashSet::new();
    teachers.iter().map(|t| t.id).find(|id| !seen.insert(*id))
}
