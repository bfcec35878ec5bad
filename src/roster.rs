use crate::form::{SaveIntent, TeacherForm};
use crate::model::{ClassRecord, StudentRecord, Teacher, TeacherId, CLASS_UNASSIGNED};
use crate::store::RosterStore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Name,
    Phone,
    Email,
    HireDate,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "hireDate" => Some(Self::HireDate),
            _ => None,
        }
    }

    fn compare(self, a: &Teacher, b: &Teacher) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Phone => a.phone.cmp(&b.phone),
            Self::Email => a.email.cmp(&b.email),
            Self::HireDate => a.hire_date.cmp(&b.hire_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortConfig {
    /// Column header click: same column flips, another column starts ascending.
    pub fn click(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Sorted copy of `teachers`; the input order is never touched.
pub fn sorted(teachers: &[Teacher], sort: SortConfig) -> Vec<Teacher> {
    let mut rows = teachers.to_vec();
    rows.sort_by(|a, b| {
        let ord = sort.key.compare(a, b);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderCheck {
    pub fn derive(selected: usize, displayed: usize) -> Self {
        if displayed > 0 && selected == displayed {
            Self::Checked
        } else if selected > 0 && selected < displayed {
            Self::Indeterminate
        } else {
            Self::Unchecked
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<TeacherId>,
}

impl Selection {
    pub fn contains(&self, id: TeacherId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: TeacherId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn set(&mut self, id: TeacherId, selected: bool) {
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    pub fn select_all<I>(&mut self, displayed: I)
    where
        I: IntoIterator<Item = TeacherId>,
    {
        self.ids = displayed.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids that are still present in `displayed`.
    pub fn count_in(&self, displayed: &[Teacher]) -> usize {
        displayed.iter().filter(|t| self.ids.contains(&t.id)).count()
    }

    /// Drops ids with no matching teacher, e.g. after the collection was
    /// replaced from outside.
    pub fn retain_present(&mut self, teachers: &[Teacher]) {
        let present: BTreeSet<TeacherId> = teachers.iter().map(|t| t.id).collect();
        self.ids.retain(|id| present.contains(id));
    }

    fn live_in(&self, teachers: &[Teacher]) -> BTreeSet<TeacherId> {
        teachers
            .iter()
            .map(|t| t.id)
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePrompt {
    pub count: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub teachers_removed: usize,
    pub classes_unassigned: usize,
    pub students_unassigned: usize,
}

/// New id derived from `now_ms`, bumped past every existing id. Falls back
/// to the lowest free positive id when that overflows or is not positive.
pub fn next_teacher_id(existing: &[Teacher], now_ms: i64) -> TeacherId {
    let candidate = match existing.iter().map(|t| t.id).max() {
        Some(max) if max >= now_ms => max.checked_add(1),
        _ => Some(now_ms),
    };
    match candidate {
        Some(id) if id > CLASS_UNASSIGNED => id,
        _ => lowest_free_id(existing),
    }
}

fn lowest_free_id(existing: &[Teacher]) -> TeacherId {
    let taken: BTreeSet<TeacherId> = existing.iter().map(|t| t.id).collect();
    let mut id = CLASS_UNASSIGNED + 1;
    while taken.contains(&id) {
        id += 1;
    }
    id
}

/// List screen state: the active sort and the checked rows.
#[derive(Debug, Clone, Default)]
pub struct RosterView {
    pub sort: SortConfig,
    pub selection: Selection,
}

impl RosterView {
    pub fn new(sort: SortConfig) -> Self {
        Self {
            sort,
            selection: Selection::default(),
        }
    }

    pub fn rows<S: RosterStore>(&self, store: &S) -> Vec<Teacher> {
        sorted(store.teachers(), self.sort)
    }

    pub fn header_check<S: RosterStore>(&self, store: &S) -> HeaderCheck {
        let displayed = store.teachers();
        HeaderCheck::derive(self.selection.count_in(displayed), displayed.len())
    }

    /// Header checkbox: checked selects every displayed row, unchecked clears.
    pub fn set_all<S: RosterStore>(&mut self, store: &S, checked: bool) {
        if checked {
            let displayed: Vec<TeacherId> = self.rows(store).iter().map(|t| t.id).collect();
            self.selection.select_all(displayed);
        } else {
            self.selection.clear();
        }
    }

    pub fn create<S: RosterStore>(store: &mut S, form: TeacherForm, now_ms: i64) -> Teacher {
        let id = next_teacher_id(store.teachers(), now_ms);
        let teacher = form.into_teacher(id);
        let mut next = store.teachers().to_vec();
        next.push(teacher.clone());
        store.replace_teachers(next);
        log::info!("teacher created id={}", id);
        teacher
    }

    /// Replaces the record with `id` in place. `None` if no such teacher.
    pub fn update<S: RosterStore>(
        store: &mut S,
        id: TeacherId,
        form: TeacherForm,
    ) -> Option<Teacher> {
        let idx = store.teachers().iter().position(|t| t.id == id)?;
        let teacher = form.into_teacher(id);
        let mut next = store.teachers().to_vec();
        next[idx] = teacher.clone();
        store.replace_teachers(next);
        log::info!("teacher updated id={}", id);
        Some(teacher)
    }

    /// Routes a modal save to create or update.
    pub fn save<S: RosterStore>(
        store: &mut S,
        intent: SaveIntent,
        now_ms: i64,
    ) -> Option<Teacher> {
        match intent.id {
            Some(id) => Self::update(store, id, intent.form),
            None => Some(Self::create(store, intent.form, now_ms)),
        }
    }

    /// Prompt for the selected teachers that still exist in `store`.
    pub fn delete_prompt<S: RosterStore>(&self, store: &S) -> Option<DeletePrompt> {
        if self.selection.is_empty() {
            return None;
        }
        let count = self.selection.count_in(store.teachers());
        if count == 0 {
            return None;
        }
        Some(DeletePrompt {
            count,
            message: format!("선택한 강사 {}명을 삭제하시겠습니까?", count),
        })
    }

    /// Deletes the selected teachers after `confirm` agrees, unlinking their
    /// classes and students. Returns `None` when nothing was done.
    ///
    /// Selected ids with no teacher in `store` are ignored; classes and
    /// students pointing at them keep their link.
    pub fn bulk_delete<S, F>(&mut self, store: &mut S, confirm: F) -> Option<CascadeReport>
    where
        S: RosterStore,
        F: FnOnce(&DeletePrompt) -> bool,
    {
        let prompt = self.delete_prompt(&*store)?;
        if !confirm(&prompt) {
            log::debug!("bulk delete of {} teachers declined", prompt.count);
            return None;
        }

        let ids = self.selection.live_in(store.teachers());
        let mut report = CascadeReport::default();

        let before = store.teachers().len();
        let teachers: Vec<Teacher> = store
            .teachers()
            .iter()
            .filter(|t| !ids.contains(&t.id))
            .cloned()
            .collect();
        report.teachers_removed = before - teachers.len();

        let classes: Vec<ClassRecord> = store
            .classes()
            .iter()
            .cloned()
            .map(|mut c| {
                if ids.contains(&c.teacher_id) {
                    c.teacher_id = CLASS_UNASSIGNED;
                    report.classes_unassigned += 1;
                }
                c
            })
            .collect();

        let students: Vec<StudentRecord> = store
            .students()
            .iter()
            .cloned()
            .map(|mut s| {
                if s.teacher_id.is_some_and(|id| ids.contains(&id)) {
                    s.teacher_id = None;
                    report.students_unassigned += 1;
                }
                s
            })
            .collect();

        store.replace_teachers(teachers);
        store.replace_classes(classes);
        store.replace_students(students);
        self.selection.clear();

        log::info!(
            "bulk delete removed {} teachers, unassigned {} classes and {} students",
            report.teachers_removed,
            report.classes_unassigned,
            report.students_unassigned
        );
        Some(report)
    }
}
