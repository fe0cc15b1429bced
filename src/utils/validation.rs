//! Request body checks against the JSON schemas the controls advertise.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::utils::error::AppError;

/// Validates `data` against `schema`, collecting every violation.
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<(), AppError> {
    let validator = Validator::new(schema).map_err(|e| {
        AppError::InternalServerError(format!("Invalid JSON Schema: {}", e))
    })?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|error| {
            let path = error.instance_path.to_string();
            if path.is_empty() {
                error.to_string()
            } else {
                format!("{}: {}", path, error)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

/// Turns an extracted JSON body into a typed input. Non-JSON requests are
/// rejected with 415, malformed or schema-violating ones with 400.
pub fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
    schema: &Value,
) -> Result<T, AppError> {
    let Json(body) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::UnsupportedMediaType("Requests must be JSON".to_string())
        }
        other => AppError::invalid(other.body_text()),
    })?;

    validate_against_schema(&body, schema)?;
    serde_json::from_value(body).map_err(|e| AppError::invalid(e.to_string()))
}
