use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_academyd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn academyd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn load_operator(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    let _ = request_ok(
        stdin,
        reader,
        "load",
        "store.load",
        json!({
            "teachers": [{
                "id": 7,
                "name": "박원장",
                "position": "원장",
                "role": "operator",
                "hireDate": "2018-02-01",
                "phone": "010-1111-2222",
                "email": "park@example.com"
            }]
        }),
    );
}

fn teacher_count(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, id: &str) -> usize {
    let snap = request_ok(stdin, reader, id, "store.snapshot", json!({}));
    snap["teachers"].as_array().map(|v| v.len()).unwrap_or(0)
}

#[test]
fn create_flow_appends_teacher_with_fresh_id() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let opened = request_ok(&mut stdin, &mut reader, "1", "teacherModal.open", json!({}));
    assert_eq!(opened["open"], json!(true));
    assert_eq!(opened["mode"], json!("create"));
    assert_eq!(opened["reseeded"], json!(true));
    assert_eq!(opened["form"]["position"], json!("강사"));
    assert_eq!(opened["form"]["role"], json!("teacher"));
    assert_eq!(opened["form"]["name"], json!(""));
    assert_eq!(
        opened["form"]["hireDate"].as_str().map(|s| s.len()),
        Some(10)
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teacherModal.edit",
        json!({ "patch": {
            "name": "최강사",
            "phone": "010-3333-4444",
            "email": "choi@example.com"
        }}),
    );
    let saved = request_ok(&mut stdin, &mut reader, "3", "teacherModal.submit", json!({}));
    assert_eq!(saved["saved"], json!(true));
    assert_eq!(saved["open"], json!(false));
    let new_id = saved["teacher"]["id"].as_i64().expect("new id");
    assert_ne!(new_id, 7);
    assert!(saved["teacher"].get("resignationDate").is_none());

    assert_eq!(teacher_count(&mut stdin, &mut reader, "4"), 2);

    let state = request_ok(&mut stdin, &mut reader, "5", "teacherModal.get", json!({}));
    assert_eq!(state["open"], json!(false));
    assert!(state["form"].is_null());
}

#[test]
fn whitespace_name_does_not_save_or_close() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let _ = request_ok(&mut stdin, &mut reader, "1", "teacherModal.open", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teacherModal.edit",
        json!({ "patch": { "name": "   " } }),
    );
    let res = request_ok(&mut stdin, &mut reader, "3", "teacherModal.submit", json!({}));
    assert_eq!(res["saved"], json!(false));
    assert_eq!(res["open"], json!(true));

    assert_eq!(teacher_count(&mut stdin, &mut reader, "4"), 1);
    let state = request_ok(&mut stdin, &mut reader, "5", "teacherModal.get", json!({}));
    assert_eq!(state["open"], json!(true));
    assert_eq!(state["form"]["name"], json!("   "));
}

#[test]
fn editing_operator_saves_admin_in_place() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "teacherModal.open",
        json!({ "teacherId": 7 }),
    );
    assert_eq!(opened["mode"], json!("edit"));
    assert_eq!(opened["teacherId"], json!(7));
    assert_eq!(opened["form"]["role"], json!("admin"));
    assert_eq!(opened["form"]["resignationDate"], json!(""));

    let saved = request_ok(&mut stdin, &mut reader, "2", "teacherModal.submit", json!({}));
    assert_eq!(saved["teacher"]["id"], json!(7));
    assert_eq!(saved["teacher"]["role"], json!("admin"));

    let snap = request_ok(&mut stdin, &mut reader, "3", "store.snapshot", json!({}));
    let teachers = snap["teachers"].as_array().expect("teachers");
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0]["role"], json!("admin"));
}

#[test]
fn reopen_same_target_keeps_edits_and_cancel_discards() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "teacherModal.open",
        json!({ "teacherId": 7 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teacherModal.edit",
        json!({ "patch": { "phone": "010-9999-0000" } }),
    );
    let again = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "teacherModal.open",
        json!({ "teacherId": 7 }),
    );
    assert_eq!(again["reseeded"], json!(false));
    assert_eq!(again["form"]["phone"], json!("010-9999-0000"));

    let _ = request_ok(&mut stdin, &mut reader, "4", "teacherModal.cancel", json!({}));
    let snap = request_ok(&mut stdin, &mut reader, "5", "store.snapshot", json!({}));
    assert_eq!(snap["teachers"][0]["phone"], json!("010-1111-2222"));

    let reopened = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "teacherModal.open",
        json!({ "teacherId": 7 }),
    );
    assert_eq!(reopened["reseeded"], json!(true));
    assert_eq!(reopened["form"]["phone"], json!("010-1111-2222"));
}

#[test]
fn modal_rejects_operator_role_and_closed_edits() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let closed = request(
        &mut stdin,
        &mut reader,
        "1",
        "teacherModal.edit",
        json!({ "patch": { "name": "x" } }),
    );
    assert_eq!(closed["error"]["code"], json!("modal_closed"));

    let _ = request_ok(&mut stdin, &mut reader, "2", "teacherModal.open", json!({}));
    let bad = request(
        &mut stdin,
        &mut reader,
        "3",
        "teacherModal.edit",
        json!({ "patch": { "role": "operator" } }),
    );
    assert_eq!(bad["error"]["code"], json!("bad_params"));

    let missing = request(
        &mut stdin,
        &mut reader,
        "4",
        "teacherModal.open",
        json!({ "teacherId": 999 }),
    );
    assert_eq!(missing["error"]["code"], json!("not_found"));
}

#[test]
fn submit_for_deleted_teacher_keeps_modal_and_edits() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_operator(&mut stdin, &mut reader);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "teacherModal.open",
        json!({ "teacherId": 7 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teacherModal.edit",
        json!({ "patch": { "phone": "010-5555-6666" } }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "teachers.select",
        json!({ "teacherId": 7 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "teachers.bulkDelete",
        json!({ "confirmed": true }),
    );

    let res = request(&mut stdin, &mut reader, "5", "teacherModal.submit", json!({}));
    assert_eq!(res["ok"], json!(false));
    assert_eq!(res["error"]["code"], json!("not_found"));
    assert_eq!(res["error"]["details"]["teacherId"], json!(7));

    let state = request_ok(&mut stdin, &mut reader, "6", "teacherModal.get", json!({}));
    assert_eq!(state["open"], json!(true));
    assert_eq!(state["mode"], json!("edit"));
    assert_eq!(state["form"]["phone"], json!("010-5555-6666"));
    assert_eq!(teacher_count(&mut stdin, &mut reader, "7"), 0);
}

#[test]
fn create_after_max_id_still_gets_a_unique_id() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "load",
        "store.load",
        json!({
            "teachers": [{
                "id": i64::MAX,
                "name": "끝번호",
                "position": "강사",
                "role": "teacher",
                "hireDate": "2020-01-01",
                "phone": "010-0000-0000",
                "email": "max@example.com"
            }]
        }),
    );

    let _ = request_ok(&mut stdin, &mut reader, "1", "teacherModal.open", json!({}));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "teacherModal.edit",
        json!({ "patch": { "name": "신규" } }),
    );
    let saved = request_ok(&mut stdin, &mut reader, "3", "teacherModal.submit", json!({}));
    assert_eq!(saved["saved"], json!(true));
    let new_id = saved["teacher"]["id"].as_i64().expect("new id");
    assert!(new_id > 0);
    assert_ne!(new_id, i64::MAX);

    // the sidecar is still alive and holds both records
    assert_eq!(teacher_count(&mut stdin, &mut reader, "4"), 2);
}
