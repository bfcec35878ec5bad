use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::store::RosterStore;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "revision": state.store.revision(),
            "teacherCount": state.store.teachers().len(),
            "classCount": state.store.classes().len(),
            "studentCount": state.store.students().len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
