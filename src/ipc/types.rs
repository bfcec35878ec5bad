use crate::config::RosterSettings;
use crate::form::TeacherModal;
use crate::roster::RosterView;
use crate::store::MemoryStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub store: MemoryStore,
    pub roster: RosterView,
    pub modal: TeacherModal,
    pub settings: RosterSettings,
}

impl AppState {
    pub fn new(settings: RosterSettings) -> Self {
        Self {
            store: MemoryStore::new(),
            roster: RosterView::new(settings.default_sort()),
            modal: TeacherModal::new(),
            settings,
        }
    }
}
