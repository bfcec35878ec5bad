use crate::config::RosterSettings;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{require_object, require_str};
use crate::ipc::types::{AppState, Request};
use crate::roster::{SortDirection, SortKey};
use serde_json::{json, Map, Value};

#[derive(Clone, Copy)]
enum SetupSection {
    Roster,
}

impl SetupSection {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "roster" => Some(Self::Roster),
            _ => None,
        }
    }
}

fn parse_section(req: &Request) -> Result<SetupSection, HandlerErr> {
    let raw = require_str(&req.params, "section")?;
    SetupSection::parse(raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "unknown setup section".to_string(),
        details: Some(json!({ "section": raw })),
    })
}

fn section_json(state: &AppState, section: SetupSection) -> Value {
    match section {
        SetupSection::Roster => json!(state.settings),
    }
}

fn apply_roster_patch(
    current: RosterSettings,
    patch: &Map<String, Value>,
) -> Result<RosterSettings, String> {
    let mut next = current;
    for (k, v) in patch {
        match k.as_str() {
            "defaultSortKey" => {
                let s = v
                    .as_str()
                    .ok_or_else(|| "defaultSortKey must be string".to_string())?;
                next.default_sort_key = SortKey::parse(s).ok_or_else(|| {
                    "defaultSortKey must be one of: id, name, phone, email, hireDate".to_string()
                })?;
            }
            "defaultSortDirection" => {
                let s = v
                    .as_str()
                    .ok_or_else(|| "defaultSortDirection must be string".to_string())?;
                next.default_sort_direction = SortDirection::parse(s)
                    .ok_or_else(|| "defaultSortDirection must be one of: asc, desc".to_string())?;
            }
            other => return Err(format!("unknown roster setting: {}", other)),
        }
    }
    Ok(next)
}

fn handle_setup_get(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let section = parse_section(req)?;
    Ok(section_json(state, section))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> Result<Value, HandlerErr> {
    let section = parse_section(req)?;
    let patch = require_object(&req.params, "patch")?;
    match section {
        SetupSection::Roster => {
            state.settings =
                apply_roster_patch(state.settings, patch).map_err(HandlerErr::bad_params)?;
            log::info!("roster settings updated: {:?}", state.settings);
        }
    }
    Ok(section_json(state, section))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let res = match req.method.as_str() {
        "setup.get" => handle_setup_get(state, req),
        "setup.update" => handle_setup_update(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_patch_updates_known_keys() {
        let patch = json!({ "defaultSortKey": "hireDate", "defaultSortDirection": "desc" });
        let next = apply_roster_patch(RosterSettings::default(), patch.as_object().expect("obj"))
            .expect("patch");
        assert_eq!(next.default_sort_key, SortKey::HireDate);
        assert_eq!(next.default_sort_direction, SortDirection::Descending);
    }

    #[test]
    fn roster_patch_rejects_unknown_keys_and_values() {
        let unknown = json!({ "pageSize": 20 });
        assert!(apply_roster_patch(RosterSettings::default(), unknown.as_object().expect("obj"))
            .is_err());
        let bad = json!({ "defaultSortKey": "position" });
        assert!(
            apply_roster_patch(RosterSettings::default(), bad.as_object().expect("obj")).is_err()
        );
    }
}
