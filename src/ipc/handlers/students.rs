use serde::Deserialize;
use serde_json::json;

use crate::error::StoreError;
use crate::ipc::helpers::{parse_params, required_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::model::{Level, NewStudent, StudentPatch};
use crate::repo::students::StudentRepo;
use crate::store::KvStore;

fn list(store: &KvStore, _params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let students = StudentRepo::new(store).list()?;
    Ok(json!({ "students": students }))
}

fn get(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let id = required_str(params, "id")?;
    let student = StudentRepo::new(store).get_by_id(&id)?;
    Ok(json!({ "student": student }))
}

fn get_by_code(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let code = required_str(params, "code")?;
    let student = StudentRepo::new(store).get_by_code(&code)?;
    Ok(json!({ "student": student }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateCodeParams {
    level: Level,
    grade: String,
    section: String,
}

fn generate_code(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let p: GenerateCodeParams = parse_params(params)?;
    let code = StudentRepo::new(store).generate_code(p.level, &p.grade, &p.section)?;
    Ok(json!({ "studentCode": code }))
}

fn add(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let new: NewStudent = parse_params(params)?;
    // Name presence is checked at this boundary, not inside the repository.
    if new.first_name.trim().is_empty() || new.last_name.trim().is_empty() {
        return Err(StoreError::invalid("firstName and lastName are required"));
    }
    let student = StudentRepo::new(store).add(new)?;
    Ok(json!({ "student": student }))
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    id: String,
    #[serde(flatten)]
    patch: StudentPatch,
}

fn update(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let p: UpdateParams = parse_params(params)?;
    let student = StudentRepo::new(store).update(&p.id, p.patch)?;
    Ok(json!({ "student": student }))
}

fn delete(store: &KvStore, params: &serde_json::Value) -> Result<serde_json::Value, StoreError> {
    let id = required_str(params, "id")?;
    let deleted = StudentRepo::new(store).delete(&id)?;
    Ok(json!({ "deleted": deleted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(respond(state, req, list)),
        "students.get" => Some(respond(state, req, get)),
        "students.getByCode" => Some(respond(state, req, get_by_code)),
        "students.generateCode" => Some(respond(state, req, generate_code)),
        "students.add" => Some(respond(state, req, add)),
        "students.update" => Some(respond(state, req, update)),
        "students.delete" => Some(respond(state, req, delete)),
        _ => None,
    }
}
