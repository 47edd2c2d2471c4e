// Forwarder failure classification
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Coarse failure class, used for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Encode,
    Transport,
    Io,
    Decode,
    Rejected,
}

/// Every way a single downstream call can fail.
///
/// The dispatcher only ever sees this type; raw `reqwest` errors are
/// converted at the forwarder boundary.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("error encoding request payload: {0}")]
    Encode(String),

    #[error("error making request to auth service: {0}")]
    Transport(String),

    #[error("error reading response body: {0}")]
    Io(String),

    #[error("error decoding response: {0}")]
    Decode(String),

    /// Call completed with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl ForwardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encode(_) => ErrorKind::Encode,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Io(_) => ErrorKind::Io,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Rejected { .. } => ErrorKind::Rejected,
        }
    }

    /// Downstream status, only for rejections
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `detail` as sent by the auth service: a plain string for handled
/// errors, a list of objects for request validation failures.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Structured(Value),
}

impl Detail {
    fn into_message(self) -> Option<String> {
        match self {
            Detail::Text(text) => Some(text),
            Detail::Structured(Value::Null) => None,
            Detail::Structured(value) => Some(value.to_string()),
        }
        .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

/// Pull a non-empty detail message out of a decoded response body.
///
/// Non-object bodies and missing or null details yield `None`.
pub fn extract_detail(body: &Value) -> Option<String> {
    if !body.is_object() {
        return None;
    }
    ErrorBody::deserialize(body)
        .unwrap_or_default()
        .detail
        .and_then(Detail::into_message)
}
