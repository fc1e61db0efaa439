use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{parse_params, required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceStatus, MatchResult};
use crate::repo::attendance::AttendanceRepo;
use crate::repo::recognition::RecognitionRepo;
use crate::store::KvStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterParams {
    student_id: String,
    #[serde(default)]
    arrival_time: Option<String>,
    #[serde(default)]
    status: Option<AttendanceStatus>,
    /// Absence date; only honored when the status is absent.
    #[serde(default)]
    date: Option<String>,
}

fn register(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let p: RegisterParams = parse_params(params)?;
    let status = p.status.unwrap_or(AttendanceStatus::Present);
    let record =
        AttendanceRepo::new(store).register(&p.student_id, p.arrival_time, status, p.date)?;
    Ok(json!({ "record": record }))
}

fn by_date(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let date = required_str(params, "date")?;
    let records = AttendanceRepo::new(store).by_date(&date)?;
    Ok(json!({ "records": records }))
}

fn by_student(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let records = AttendanceRepo::new(store).by_student(&student_id)?;
    Ok(json!({ "records": records }))
}

fn stats(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let start = required_str(params, "startDate")?;
    let end = required_str(params, "endDate")?;
    let stats = AttendanceRepo::new(store).stats(&start, &end)?;
    Ok(serde_json::to_value(stats)?)
}

/// Check-in via the recognition stub: a match marks the student present
/// with the current wall-clock arrival time.
fn register_by_face(
    store: &KvStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, StoreError> {
    let image_ref = required_str(params, "imageRef")?;
    let outcome = RecognitionRepo::new(store).recognize(&image_ref)?;
    match &outcome {
        MatchResult::Match { student_id, .. } => {
            let arrival = Local::now().format("%H:%M").to_string();
            let record = AttendanceRepo::new(store).register(
                student_id,
                Some(arrival),
                AttendanceStatus::Present,
                None,
            )?;
            Ok(json!({ "match": outcome, "record": record }))
        }
        MatchResult::NoMatch => Ok(json!({ "match": outcome, "record": null })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.register" => Some(respond(state, req, register)),
        "attendance.byDate" => Some(respond(state, req, by_date)),
        "attendance.byStudent" => Some(respond(state, req, by_student)),
        "attendance.stats" => Some(respond(state, req, stats)),
        "attendance.registerByFace" => Some(respond(state, req, register_by_face)),
        _ => None,
    }
}
