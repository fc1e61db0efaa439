use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_kairosd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn kairosd");
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
    let payload = json!({ "id": id, "method": method, "params": params });
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
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().expect("result")
}

#[test]
fn calendar_events_crud_lifecycle() {
    let workspace = temp_dir("kairos-calendar");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Title and date are mandatory.
    let rejected = request(
        &mut stdin,
        &mut reader,
        "2",
        "calendar.events.add",
        json!({ "title": "  ", "date": "2025-04-01" }),
    );
    assert_eq!(rejected["error"]["code"], "bad_params");

    let added = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "calendar.events.add",
        json!({
            "title": "Día del Logro",
            "date": "2025-04-15",
            "time": "10:00",
            "description": "Presentación de proyectos"
        }),
    );
    let event_id = added["event"]["id"].as_str().expect("id").to_string();
    assert!(added["event"]["createdAt"].is_string());
    assert_eq!(added["event"]["updatedAt"], serde_json::Value::Null);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "calendar.events.update",
        json!({ "id": event_id, "time": "11:00" }),
    );
    assert_eq!(updated["event"]["time"], "11:00");
    assert_eq!(updated["event"]["title"], "Día del Logro");
    assert!(updated["event"]["updatedAt"].is_string());

    let missing = request(
        &mut stdin,
        &mut reader,
        "5",
        "calendar.events.update",
        json!({ "id": "nope", "title": "X" }),
    );
    assert_eq!(missing["error"]["code"], "not_found");

    let list = request_ok(&mut stdin, &mut reader, "6", "calendar.events.list", json!({}));
    assert_eq!(list["events"].as_array().expect("events").len(), 1);

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "calendar.events.delete",
        json!({ "id": event_id }),
    );
    assert_eq!(deleted["deleted"], true);

    // Deleting again is a no-op, not an error.
    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "calendar.events.delete",
        json!({ "id": event_id }),
    );
    assert_eq!(deleted["deleted"], false);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn notifications_read_state_and_clear() {
    let workspace = temp_dir("kairos-notifications");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let rejected = request(
        &mut stdin,
        &mut reader,
        "2",
        "notifications.add",
        json!({ "title": "Aviso", "message": "" }),
    );
    assert_eq!(rejected["error"]["code"], "bad_params");

    let added = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "notifications.add",
        json!({ "title": "Aviso", "message": "Mañana no hay clases." }),
    );
    let id = added["notification"]["id"].as_str().expect("id").to_string();
    assert_eq!(added["notification"]["read"], false);
    assert_eq!(added["notification"]["readAt"], serde_json::Value::Null);

    let read = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "notifications.markRead",
        json!({ "id": id }),
    );
    assert_eq!(read["notification"]["read"], true);
    assert!(read["notification"]["readAt"].is_string());

    let missing = request(
        &mut stdin,
        &mut reader,
        "5",
        "notifications.markRead",
        json!({ "id": "nope" }),
    );
    assert_eq!(missing["error"]["code"], "not_found");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "notifications.add",
        json!({ "title": "Otro", "message": "Segunda notificación." }),
    );
    let list = request_ok(&mut stdin, &mut reader, "7", "notifications.list", json!({}));
    assert_eq!(list["notifications"].as_array().expect("list").len(), 2);

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "notifications.delete",
        json!({ "id": id }),
    );
    assert_eq!(deleted["deleted"], true);

    let _ = request_ok(&mut stdin, &mut reader, "9", "notifications.clear", json!({}));
    let list = request_ok(&mut stdin, &mut reader, "10", "notifications.list", json!({}));
    assert_eq!(list["notifications"].as_array().expect("list").len(), 0);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
