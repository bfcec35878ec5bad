use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type TeacherId = i64;

/// `Class.teacherId` value for a class with no teacher.
pub const CLASS_UNASSIGNED: TeacherId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "원장")]
    Director,
    #[serde(rename = "강사")]
    Instructor,
    #[serde(rename = "직원")]
    Staff,
}

impl Position {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "원장" => Some(Self::Director),
            "강사" => Some(Self::Instructor),
            "직원" => Some(Self::Staff),
            _ => None,
        }
    }
}

/// Access level. `Operator` only survives in records written by older
/// versions of the academy app; it behaves as `Admin` everywhere here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Operator,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "operator" => Some(Self::Operator),
            _ => None,
        }
    }

    /// Role as shown in the list and seeded into the edit form.
    pub fn normalized(self) -> Self {
        match self {
            Self::Operator => Self::Admin,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub position: Position,
    pub role: Role,
    pub hire_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resignation_date: Option<String>,
    pub phone: String,
    pub email: String,
}

/// Class row as owned by the parent app. Only the teacher link is
/// interpreted; every other field round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    #[serde(default)]
    pub teacher_id: TeacherId,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
