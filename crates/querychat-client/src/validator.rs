//! Shape check for decoded backend payloads.
//!
//! The backend is not trusted: anything it returns goes through
//! [`validate`] before the session looks at it. Only the envelope is
//! checked; `sql` and `data` pass through untouched.

use serde_json::{Map, Value};

use crate::message::Visualization;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Respuesta inválida del servidor")]
    NotAnObject,
    #[error("visualization debe ser 'bar', 'line' o 'table'")]
    InvalidVisualization(String),
}

/// A payload that passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    pub sql: Option<String>,
    pub data: Option<Value>,
    pub visualization: Option<Visualization>,
    /// Backend-reported failure; `None` means success.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid(QueryResponse),
    Invalid(ValidationError),
}

impl Validated {
    pub fn into_result(self) -> Result<QueryResponse, ValidationError> {
        match self {
            Validated::Valid(response) => Ok(response),
            Validated::Invalid(err) => Err(err),
        }
    }
}

pub fn validate(payload: Value) -> Validated {
    let Value::Object(mut fields) = payload else {
        return Validated::Invalid(ValidationError::NotAnObject);
    };

    let visualization = match fields.remove("visualization") {
        None | Some(Value::Null) => None,
        Some(Value::String(kind)) => match Visualization::parse(&kind) {
            Some(v) => Some(v),
            None => return Validated::Invalid(ValidationError::InvalidVisualization(kind)),
        },
        Some(other) => {
            return Validated::Invalid(ValidationError::InvalidVisualization(other.to_string()))
        }
    };

    Validated::Valid(QueryResponse {
        sql: take_text(&mut fields, "sql"),
        data: fields.remove("data").filter(|v| !v.is_null()),
        visualization,
        error: take_text(&mut fields, "error"),
    })
}

/// Strings are taken as-is, other non-null values as their JSON text.
fn take_text(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
