//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod expenses;
pub mod incomes;
pub mod pages;
pub mod reports;

// Re-export all handlers for use in router
pub use audit::*;
pub use expenses::*;
pub use incomes::*;
pub use pages::*;
pub use reports::*;

use axum::extract::Request;
use serde_json::{Map, Value};

use tally_core::models::ValidationErrors;

use crate::{AppError, MAX_BODY_SIZE};

/// Read a JSON object body
async fn read_json_object(request: Request) -> Result<Map<String, Value>, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::bad_request("Expected a JSON object")),
        Err(_) => Err(AppError::bad_request("Invalid JSON")),
    }
}

/// The title, which must be a JSON string
///
/// Any other present value is recorded in `type_errors` and treated as missing.
fn title_field(body: &Map<String, Value>, type_errors: &mut ValidationErrors) -> Option<String> {
    match body.get("title")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => {
            type_errors.add("title", "The title must be a string.");
            None
        }
    }
}

/// A text field; numbers are stringified, anything else counts as missing
fn text_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A numeric field; numeric strings are accepted
///
/// Present but non-numeric values come back as NaN so validation reports
/// "must be a number" rather than "required".
fn amount_field(body: &Map<String, Value>) -> Option<f64> {
    match body.get("amount")? {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }
}

/// Turn a validation outcome into a response, body type errors winning per field
fn finish_validation<T>(
    outcome: Result<T, ValidationErrors>,
    type_errors: ValidationErrors,
) -> Result<T, AppError> {
    match outcome {
        Ok(valid) if type_errors.is_empty() => Ok(valid),
        Ok(_) => Err(AppError::validation(&type_errors)),
        Err(mut errors) => {
            errors.override_with(type_errors);
            Err(AppError::validation(&errors))
        }
    }
}
