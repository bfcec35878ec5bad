use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::optional_list;
use crate::ipc::types::{AppState, Request};
use crate::model::{ClassRecord, StudentRecord, Teacher};
use crate::store::{find_duplicate_id, RosterStore};
use serde_json::json;

fn counts(state: &AppState) -> serde_json::Value {
    json!({
        "revision": state.store.revision(),
        "teacherCount": state.store.teachers().len(),
        "classCount": state.store.classes().len(),
        "studentCount": state.store.students().len(),
    })
}

/// Replaces any of the three collections the shell sends. All three are
/// decoded before anything is written.
fn handle_store_load(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let teachers: Option<Vec<Teacher>> = optional_list(&req.params, "teachers")?;
    let classes: Option<Vec<ClassRecord>> = optional_list(&req.params, "classes")?;
    let students: Option<Vec<StudentRecord>> = optional_list(&req.params, "students")?;

    if let Some(dup) = teachers.as_deref().and_then(find_duplicate_id) {
        return Err(HandlerErr {
            code: "bad_params",
            message: "teacher ids must be unique".to_string(),
            details: Some(json!({ "teacherId": dup })),
        });
    }

    if let Some(t) = teachers {
        log::info!("store.load: {} teachers", t.len());
        state.store.replace_teachers(t);
        state.roster.selection.retain_present(state.store.teachers());
    }
    if let Some(c) = classes {
        log::info!("store.load: {} classes", c.len());
        state.store.replace_classes(c);
    }
    if let Some(s) = students {
        log::info!("store.load: {} students", s.len());
        state.store.replace_students(s);
    }
    Ok(counts(state))
}

fn handle_store_snapshot(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "revision": state.store.revision(),
        "teachers": state.store.teachers(),
        "classes": state.store.classes(),
        "students": state.store.students(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "store.load" => handle_store_load(state, req),
        "store.snapshot" => handle_store_snapshot(state),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
