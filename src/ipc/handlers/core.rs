use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::respond;
use crate::ipc::types::{AppState, Request};
use crate::repo::schedule::ScheduleRepo;
use crate::seed;
use crate::store::{KvStore, FACE_DATA_KEY, GRADES_KEY, NOTIFICATIONS_KEY, STUDENTS_KEY};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match KvStore::open(&path) {
        Ok(store) => {
            // The weekly template is part of first-run setup; demo data is
            // only written by an explicit demo.seed call.
            if let Err(e) = ScheduleRepo::new(&store).ensure_default() {
                return err(&req.id, e.code(), e.to_string(), None);
            }
            tracing::info!(path = %path.display(), "workspace opened");
            state.workspace = Some(path.clone());
            state.store = Some(store);
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "store_open_failed", format!("{e:?}"), None),
    }
}

/// Seeds each demo collection whose key is absent; never overwrites.
fn seed_demo(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let mut seeded = Vec::new();
    if !store.contains(STUDENTS_KEY)? {
        store.set_json(STUDENTS_KEY, &seed::demo_students())?;
        seeded.push("students");
    }
    if !store.contains(GRADES_KEY)? {
        store.set_json(GRADES_KEY, &seed::demo_grade_books())?;
        seeded.push("grades");
    }
    if !store.contains(FACE_DATA_KEY)? {
        store.set_json(FACE_DATA_KEY, &seed::demo_face_profiles())?;
        seeded.push("faceProfiles");
    }
    if !store.contains(NOTIFICATIONS_KEY)? {
        store.set_json(NOTIFICATIONS_KEY, &seed::example_notifications(Utc::now()))?;
        seeded.push("notifications");
    }
    Ok(json!({ "seeded": seeded }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "demo.seed" => Some(respond(state, req, seed_demo)),
        _ => None,
    }
}
