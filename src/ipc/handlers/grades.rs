use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{required_f64, required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::repo::grades::GradeRepo;
use crate::store::KvStore;

fn for_student(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let grades = GradeRepo::new(store).for_student(&student_id)?;
    Ok(json!({ "grades": grades }))
}

fn update_score(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let subject = required_str(params, "subject")?;
    let period = required_str(params, "period")?;
    let score = required_f64(params, "score")?;
    let promedio = GradeRepo::new(store).update_score(&student_id, &subject, &period, score)?;
    Ok(json!({ "promedio": promedio }))
}

fn entries_list(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let grades = GradeRepo::new(store).entries(&student_id)?;
    Ok(json!({ "grades": grades }))
}

fn entries_add(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let entry = params
        .get("grade")
        .cloned()
        .ok_or_else(|| StoreError::invalid("missing grade"))?;
    let stored = GradeRepo::new(store).add_entry(&student_id, entry)?;
    Ok(json!({ "grade": stored }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.forStudent" => Some(respond(state, req, for_student)),
        "grades.updateScore" => Some(respond(state, req, update_score)),
        "grades.entries.list" => Some(respond(state, req, entries_list)),
        "grades.entries.add" => Some(respond(state, req, entries_add)),
        _ => None,
    }
}
