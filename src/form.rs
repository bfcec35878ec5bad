use crate::model::{Position, Role, Teacher, TeacherId};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Editable copy of a teacher while the modal is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherForm {
    pub name: String,
    pub position: Position,
    pub role: Role,
    pub hire_date: String,
    pub resignation_date: String,
    pub phone: String,
    pub email: String,
}

impl TeacherForm {
    /// Blank form used when adding a new teacher.
    pub fn template(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            position: Position::Instructor,
            role: Role::Teacher,
            hire_date: today.format("%Y-%m-%d").to_string(),
            resignation_date: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }

    pub fn from_teacher(t: &Teacher) -> Self {
        Self {
            name: t.name.clone(),
            position: t.position,
            role: t.role.normalized(),
            hire_date: t.hire_date.clone(),
            resignation_date: t.resignation_date.clone().unwrap_or_default(),
            phone: t.phone.clone(),
            email: t.email.clone(),
        }
    }

    pub fn apply(&mut self, field: FormField) {
        match field {
            FormField::Name(v) => self.name = v,
            FormField::Position(v) => self.position = v,
            FormField::Role(v) => self.role = v,
            FormField::HireDate(v) => self.hire_date = v,
            FormField::ResignationDate(v) => self.resignation_date = v,
            FormField::Phone(v) => self.phone = v,
            FormField::Email(v) => self.email = v,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn into_teacher(self, id: TeacherId) -> Teacher {
        let resignation_date = if self.resignation_date.is_empty() {
            None
        } else {
            Some(self.resignation_date)
        };
        Teacher {
            id,
            name: self.name,
            position: self.position,
            role: self.role,
            hire_date: self.hire_date,
            resignation_date,
            phone: self.phone,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Name(String),
    Position(Position),
    Role(Role),
    HireDate(String),
    ResignationDate(String),
    Phone(String),
    Email(String),
}

fn string_value(v: &Value, key: &str) -> Result<String, String> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{} must be string", key))
}

impl FormField {
    pub fn parse(key: &str, v: &Value) -> Result<Self, String> {
        match key {
            "name" => Ok(Self::Name(string_value(v, key)?)),
            "position" => {
                let s = string_value(v, key)?;
                Position::parse(&s)
                    .map(Self::Position)
                    .ok_or_else(|| "position must be one of: 원장, 강사, 직원".to_string())
            }
            "role" => {
                // The legacy operator role is never written back.
                match Role::parse(&string_value(v, key)?) {
                    Some(role @ (Role::Admin | Role::Teacher)) => Ok(Self::Role(role)),
                    _ => Err("role must be one of: admin, teacher".to_string()),
                }
            }
            "hireDate" => Ok(Self::HireDate(string_value(v, key)?)),
            "resignationDate" => match v {
                Value::Null => Ok(Self::ResignationDate(String::new())),
                _ => Ok(Self::ResignationDate(string_value(v, key)?)),
            },
            "phone" => Ok(Self::Phone(string_value(v, key)?)),
            "email" => Ok(Self::Email(string_value(v, key)?)),
            other => Err(format!("unknown form field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Closed,
    Invalid(String),
}

/// What `submit` hands back to the list when validation passes.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveIntent {
    /// `None` when the modal was opened to add a teacher.
    pub id: Option<TeacherId>,
    pub form: TeacherForm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    Closed,
    Open {
        target: Option<Teacher>,
        form: TeacherForm,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeacherModal {
    state: ModalState,
}

impl Default for TeacherModal {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }
}

impl TeacherModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn form(&self) -> Option<&TeacherForm> {
        match &self.state {
            ModalState::Open { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    pub fn target(&self) -> Option<&Teacher> {
        match &self.state {
            ModalState::Open { target, .. } => target.as_ref(),
            ModalState::Closed => None,
        }
    }

    /// Opens the modal for `target` (or for a new teacher).
    ///
    /// The form is re-seeded on closed -> open and when the target changes
    /// while open. Reopening with the same target keeps in-progress edits.
    /// Returns whether the form was re-seeded.
    pub fn open(&mut self, target: Option<Teacher>, today: NaiveDate) -> bool {
        if let ModalState::Open {
            target: current, ..
        } = &self.state
        {
            if *current == target {
                return false;
            }
        }
        let form = match &target {
            Some(t) => TeacherForm::from_teacher(t),
            None => TeacherForm::template(today),
        };
        self.state = ModalState::Open { target, form };
        true
    }

    pub fn edit(&mut self, field: FormField) -> Result<(), EditError> {
        match &mut self.state {
            ModalState::Open { form, .. } => {
                form.apply(field);
                Ok(())
            }
            ModalState::Closed => Err(EditError::Closed),
        }
    }

    /// Applies a JSON patch of form fields. Either every field applies or
    /// none does.
    pub fn edit_patch(&mut self, patch: &Map<String, Value>) -> Result<(), EditError> {
        if !self.is_open() {
            return Err(EditError::Closed);
        }
        let mut fields = Vec::with_capacity(patch.len());
        for (k, v) in patch {
            fields.push(FormField::parse(k, v).map_err(EditError::Invalid)?);
        }
        for f in fields {
            self.edit(f)?;
        }
        Ok(())
    }

    /// Validates and closes. A blank name leaves the modal open and yields
    /// nothing.
    pub fn submit(&mut self) -> Option<SaveIntent> {
        let intent = match &self.state {
            ModalState::Open { target, form } if form.has_name() => SaveIntent {
                id: target.as_ref().map(|t| t.id),
                form: form.clone(),
            },
            _ => return None,
        };
        self.state = ModalState::Closed;
        Some(intent)
    }

    pub fn cancel(&mut self) {
        self.state = ModalState::Closed;
    }
}
