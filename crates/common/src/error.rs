use crate::form::FieldError;
use thiserror::Error;

/// Message used when the server rejects a request without a `detail` field.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {name} is not a {expected} field")]
    WrongFieldKind { name: String, expected: &'static str },

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("{file} is not an accepted type for {field} (accepts {accepted})")]
    UnacceptedFileType {
        field: String,
        file: String,
        accepted: String,
    },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid listing response: {0}")]
    Schema(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build a server error from a non-success response body.
    ///
    /// The `detail` string is used verbatim when present.
    pub fn from_response(status: u16, body: Option<&serde_json::Value>) -> Self {
        let message = body
            .and_then(|b| b.get("detail"))
            .and_then(|d| d.as_str())
            .unwrap_or(GENERIC_FAILURE)
            .to_string();
        Error::Server { status, message }
    }

    /// Field errors carried by a validation failure, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
