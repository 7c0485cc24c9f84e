//! Field-level parsing of loosely-typed creation payloads.
//!
//! The creation endpoint accepts arbitrary JSON and reports which field is
//! mistyped instead of letting the deserializer reject the whole body, so a
//! numeric `content` or a string `ttl_seconds` comes back as a validation
//! error naming that field.

use fadebin_core::{models::paste::CreateParams, AppError};
use serde_json::{Map, Value};

/// Extract creation parameters from a raw JSON body.
///
/// Type checks happen here; range checks happen in the lifecycle layer.
///
/// # Errors
/// Returns [`AppError::Validation`] naming the first offending field.
pub fn create_params(body: &Value) -> Result<CreateParams, AppError> {
    let Some(object) = body.as_object() else {
        return Err(AppError::validation("body", "must be a JSON object"));
    };
    let content = match object.get("content") {
        Some(Value::String(content)) => content.clone(),
        Some(_) => return Err(AppError::validation("content", "must be a string")),
        None => return Err(AppError::validation("content", "is required")),
    };
    Ok(CreateParams {
        content,
        ttl_seconds: integer_field(object, "ttl_seconds")?,
        max_views: integer_field(object, "max_views")?,
    })
}

fn integer_field(object: &Map<String, Value>, field: &'static str) -> Result<Option<i64>, AppError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| AppError::validation(field, "must be an integer")),
        Some(_) => Err(AppError::validation(field, "must be an integer")),
    }
}
