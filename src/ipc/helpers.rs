use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::store::KvStore;

/// Runs one store-backed operation and wraps its outcome in the response
/// envelope. Every method except the core ones requires a workspace.
pub fn respond(
    state: &AppState,
    req: &Request,
    op: impl FnOnce(&KvStore, &serde_json::Value) -> Result<serde_json::Value, StoreError>,
) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match op(store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(params.clone())
        .map_err(|e| StoreError::invalid(format!("bad params: {e}")))
}

pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, StoreError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::invalid(format!("missing {key}")))
}

pub fn required_f64(params: &serde_json::Value, key: &str) -> Result<f64, StoreError> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| StoreError::invalid(format!("missing {key}")))
}
