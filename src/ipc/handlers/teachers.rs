use crate::form::TeacherForm;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{require_bool, require_i64, require_object, require_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{Position, Role, Teacher};
use crate::roster::{RosterView, SortKey};
use crate::store::RosterStore;
use serde_json::{json, Map, Value};

fn row_json(t: &Teacher, selected: bool) -> Value {
    json!({
        "id": t.id,
        "name": t.name,
        "position": t.position,
        "role": t.role.normalized(),
        "hireDate": t.hire_date,
        "resignationDate": t.resignation_date,
        "phone": t.phone,
        "email": t.email,
        "selected": selected,
    })
}

fn selection_summary(state: &AppState) -> Value {
    json!({
        "selectedCount": state.roster.selection.count_in(state.store.teachers()),
        "headerCheck": state.roster.header_check(&state.store),
    })
}

fn handle_teachers_list(state: &mut AppState) -> Result<Value, HandlerErr> {
    let rows: Vec<Value> = state
        .roster
        .rows(&state.store)
        .iter()
        .map(|t| row_json(t, state.roster.selection.contains(t.id)))
        .collect();
    let mut out = selection_summary(state);
    out["rows"] = json!(rows);
    out["sort"] = json!(state.roster.sort);
    Ok(out)
}

fn handle_teachers_sort(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let raw = require_str(&req.params, "key")?;
    let key = SortKey::parse(raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "key must be one of: id, name, phone, email, hireDate".to_string(),
        details: Some(json!({ "key": raw })),
    })?;
    state.roster.sort.click(key);
    Ok(json!({ "sort": state.roster.sort }))
}

fn handle_teachers_sort_reset(state: &mut AppState) -> Result<Value, HandlerErr> {
    state.roster.sort = state.settings.default_sort();
    Ok(json!({ "sort": state.roster.sort }))
}

fn handle_teachers_select(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let teacher_id = require_i64(&req.params, "teacherId")?;
    if !state.store.teachers().iter().any(|t| t.id == teacher_id) {
        return Err(HandlerErr::not_found(
            "teacher not found",
            json!({ "teacherId": teacher_id }),
        ));
    }
    let selected = match req.params.get("selected") {
        None | Some(Value::Null) => state.roster.selection.toggle(teacher_id),
        Some(_) => {
            let v = require_bool(&req.params, "selected")?;
            state.roster.selection.set(teacher_id, v);
            v
        }
    };
    let mut out = selection_summary(state);
    out["teacherId"] = json!(teacher_id);
    out["selected"] = json!(selected);
    Ok(out)
}

fn handle_teachers_select_all(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let checked = require_bool(&req.params, "checked")?;
    state.roster.set_all(&state.store, checked);
    Ok(selection_summary(state))
}

fn handle_bulk_delete_prompt(state: &mut AppState) -> Result<Value, HandlerErr> {
    Ok(json!({ "prompt": state.roster.delete_prompt(&state.store) }))
}

fn handle_bulk_delete(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let confirmed = require_bool(&req.params, "confirmed")?;
    let AppState { store, roster, .. } = state;
    match roster.bulk_delete(store, |_| confirmed) {
        Some(report) => {
            let mut out = json!(report);
            out["deleted"] = json!(true);
            Ok(out)
        }
        None => Ok(json!({ "deleted": false })),
    }
}

fn parse_record(record: &Map<String, Value>) -> Result<TeacherForm, HandlerErr> {
    let str_field = |key: &str| -> Result<String, HandlerErr> {
        match record.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(HandlerErr::bad_params(format!("record.{} must be string", key))),
            None => Err(HandlerErr::bad_params(format!("missing record.{}", key))),
        }
    };
    let name = str_field("name")?;
    if name.trim().is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }
    let position = Position::parse(&str_field("position")?)
        .ok_or_else(|| HandlerErr::bad_params("position must be one of: 원장, 강사, 직원"))?;
    let role = match Role::parse(&str_field("role")?) {
        Some(role @ (Role::Admin | Role::Teacher)) => role,
        _ => return Err(HandlerErr::bad_params("role must be one of: admin, teacher")),
    };
    let resignation_date = match record.get("resignationDate") {
        None | Some(Value::Null) => String::new(),
        Some(_) => str_field("resignationDate")?,
    };
    Ok(TeacherForm {
        name,
        position,
        role,
        hire_date: str_field("hireDate")?,
        resignation_date,
        phone: str_field("phone")?,
        email: str_field("email")?,
    })
}

fn handle_teachers_update(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let teacher_id = require_i64(&req.params, "teacherId")?;
    let form = parse_record(require_object(&req.params, "record")?)?;
    match RosterView::update(&mut state.store, teacher_id, form) {
        Some(teacher) => Ok(json!({ "teacher": teacher })),
        None => Err(HandlerErr::not_found(
            "teacher not found",
            json!({ "teacherId": teacher_id }),
        )),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let res = match req.method.as_str() {
        "teachers.list" => handle_teachers_list(state),
        "teachers.sort" => handle_teachers_sort(state, req),
        "teachers.sort.reset" => handle_teachers_sort_reset(state),
        "teachers.select" => handle_teachers_select(state, req),
        "teachers.selectAll" => handle_teachers_select_all(state, req),
        "teachers.bulkDelete.prompt" => handle_bulk_delete_prompt(state),
        "teachers.bulkDelete" => handle_bulk_delete(state, req),
        "teachers.update" => handle_teachers_update(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
