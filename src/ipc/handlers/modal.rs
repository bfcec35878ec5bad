use crate::form::{EditError, TeacherModal};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{optional_teacher_id, require_object};
use crate::ipc::types::{AppState, Request};
use crate::roster::RosterView;
use crate::store::RosterStore;
use chrono::{Local, Utc};
use serde_json::{json, Value};

fn modal_closed() -> HandlerErr {
    HandlerErr {
        code: "modal_closed",
        message: "open the teacher form first".to_string(),
        details: None,
    }
}

fn modal_json(modal: &TeacherModal) -> Value {
    let mode = match (modal.is_open(), modal.target()) {
        (false, _) => Value::Null,
        (true, Some(_)) => json!("edit"),
        (true, None) => json!("create"),
    };
    json!({
        "open": modal.is_open(),
        "mode": mode,
        "teacherId": modal.target().map(|t| t.id),
        "form": modal.form(),
    })
}

fn handle_modal_open(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let target = match optional_teacher_id(&req.params, "teacherId")? {
        Some(id) => {
            let found = state.store.teachers().iter().find(|t| t.id == id).cloned();
            Some(found.ok_or_else(|| {
                HandlerErr::not_found("teacher not found", json!({ "teacherId": id }))
            })?)
        }
        None => None,
    };
    let reseeded = state.modal.open(target, Local::now().date_naive());
    let mut out = modal_json(&state.modal);
    out["reseeded"] = json!(reseeded);
    Ok(out)
}

fn handle_modal_get(state: &mut AppState) -> Result<Value, HandlerErr> {
    Ok(modal_json(&state.modal))
}

fn handle_modal_edit(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let patch = require_object(&req.params, "patch")?;
    match state.modal.edit_patch(patch) {
        Ok(()) => Ok(modal_json(&state.modal)),
        Err(EditError::Closed) => Err(modal_closed()),
        Err(EditError::Invalid(msg)) => Err(HandlerErr::bad_params(msg)),
    }
}

fn handle_modal_submit(state: &mut AppState) -> Result<Value, HandlerErr> {
    if !state.modal.is_open() {
        return Err(modal_closed());
    }
    // An edit target removed since the form opened keeps the modal open with
    // its edits, so the shell can cancel or retry.
    if let Some(id) = state.modal.target().map(|t| t.id) {
        if !state.store.teachers().iter().any(|t| t.id == id) {
            return Err(HandlerErr::not_found(
                "teacher not found",
                json!({ "teacherId": id }),
            ));
        }
    }
    let Some(intent) = state.modal.submit() else {
        log::debug!("teacher form submit ignored: blank name");
        return Ok(json!({ "saved": false, "open": true }));
    };
    let target_id = intent.id;
    match RosterView::save(&mut state.store, intent, Utc::now().timestamp_millis()) {
        Some(teacher) => Ok(json!({ "saved": true, "open": false, "teacher": teacher })),
        None => Err(HandlerErr::not_found(
            "teacher not found",
            json!({ "teacherId": target_id }),
        )),
    }
}

fn handle_modal_cancel(state: &mut AppState) -> Result<Value, HandlerErr> {
    state.modal.cancel();
    Ok(json!({ "open": false }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let res = match req.method.as_str() {
        "teacherModal.open" => handle_modal_open(state, req),
        "teacherModal.get" => handle_modal_get(state),
        "teacherModal.edit" => handle_modal_edit(state, req),
        "teacherModal.submit" => handle_modal_submit(state),
        "teacherModal.cancel" => handle_modal_cancel(state),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
