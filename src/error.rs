use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;

use serde::Serialize;

use thiserror::Error;

// Unknown error.
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown";

/// Reasons an input document cannot become a light state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Missing `mode` field")]
    MissingMode,

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Field `{field}` is not an integer")]
    BadFieldType { field: &'static str },

    #[error("Field `{field}` is out of range [0, 255]: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

// Error document returned to clients.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    status: u16,
    error: String,
}

impl ErrorBody {
    fn new(status: Status, error: impl ToString) -> Json<Self> {
        Json(Self {
            status: status.code,
            error: error.to_string(),
        })
    }
}

// Rejected request body.
#[derive(Responder)]
#[response(status = 400)]
pub(crate) struct BadRequest(Json<ErrorBody>);

impl BadRequest {
    // Reject a body with the given message.
    pub(crate) fn text(error_message: impl ToString) -> Self {
        Self(ErrorBody::new(Status::BadRequest, error_message))
    }
}

impl From<ValidationError> for BadRequest {
    fn from(error: ValidationError) -> Self {
        Self::text(error)
    }
}

// Renders any other kind of failure as an error document
#[catch(default)]
pub(crate) fn default(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (
        status,
        ErrorBody::new(status, status.reason().unwrap_or(UNKNOWN_ERROR_MESSAGE)),
    )
}

// Returns all defined catchers
pub(crate) fn catchers() -> Vec<rocket::Catcher> {
    catchers![default]
}
