use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::repo::recognition::RecognitionRepo;
use crate::repo::students::StudentRepo;
use crate::store::KvStore;

fn recognize(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let image_ref = required_str(params, "imageRef")?;
    let outcome = RecognitionRepo::new(store).recognize(&image_ref)?;
    Ok(serde_json::to_value(outcome)?)
}

/// Enrolls the student first when no profile exists, then stamps the id.
fn register_face(
    store: &KvStore,
    params: &serde_json::Value,
) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let image_ref = required_str(params, "imageRef")?;
    let repo = RecognitionRepo::new(store);
    let already_enrolled = repo
        .profiles()?
        .iter()
        .any(|p| p.id == student_id);
    if !already_enrolled {
        let student = StudentRepo::new(store)
            .get_by_id(&student_id)?
            .ok_or_else(|| StoreError::not_found(format!("student {student_id}")))?;
        repo.enroll(&student)?;
    }
    let profile = repo.register_face(&student_id, &image_ref)?;
    Ok(json!({ "profile": profile }))
}

fn profiles(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let profiles = RecognitionRepo::new(store).profiles()?;
    Ok(json!({ "profiles": profiles }))
}

fn has_face(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let student_id = required_str(params, "studentId")?;
    let registered = RecognitionRepo::new(store).has_face(&student_id)?;
    Ok(json!({ "registered": registered }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "recognition.recognize" => Some(respond(state, req, recognize)),
        "recognition.registerFace" => Some(respond(state, req, register_face)),
        "recognition.profiles" => Some(respond(state, req, profiles)),
        "recognition.hasFace" => Some(respond(state, req, has_face)),
        _ => None,
    }
}
