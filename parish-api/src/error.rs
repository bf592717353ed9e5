use anyhow::{anyhow, Context};
use serde_json::json;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the error the server most likely meant, when its body could not be parsed
    pub fn from_status(status: http::StatusCode) -> Error {
        use http::StatusCode;
        match status {
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Error::PermissionDenied,
            s if s.is_client_error() => Error::InvalidRequest(String::new()),
            _ => Error::Unknown(String::new()),
        }
    }

    /// Message suitable for showing to the user, if the server provided one
    pub fn message(&self) -> Option<&str> {
        let msg = match self {
            Error::InvalidRequest(msg) | Error::Unknown(msg) => msg,
            Error::NotFound | Error::PermissionDenied => return None,
        };
        (!msg.is_empty()).then(|| msg.as_str())
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::NotFound => json!({
                "message": "not found",
                "type": "not-found",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::InvalidRequest(msg) => json!({
                "message": msg,
                "type": "invalid-request",
            }),
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
        })
        .expect("serializing error")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let message = || {
            data.get("message")
                .or_else(|| data.get("error"))
                .and_then(|msg| msg.as_str())
                .map(String::from)
        };
        Ok(match data.get("type").and_then(|t| t.as_str()) {
            Some("not-found") => Error::NotFound,
            Some("permission-denied") => Error::PermissionDenied,
            Some("invalid-request") => Error::InvalidRequest(message().unwrap_or_default()),
            Some("unknown") => Error::Unknown(message().unwrap_or_default()),
            Some(_) => return Err(anyhow!("error contents has unknown type")),
            // plain `{ "message": ... }` or `{ "error": ... }` bodies
            None => Error::Unknown(
                message().ok_or_else(|| anyhow!("error contents has neither type nor message"))?,
            ),
        })
    }
}
