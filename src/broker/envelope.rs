use serde::Deserialize;
use thiserror::Error;

use crate::broker::upstream::Operation;
use crate::models::{AuthPayload, UserPayload};

/// Inbound `/handle` body as sent by clients.
///
/// Only the sub-payload matching `action` is used.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub auth: Option<AuthPayload>,
    #[serde(default)]
    pub register: Option<UserPayload>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Recognized actions, each with its own payload
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Authenticate(AuthPayload),
    Refresh(String),
    Register(UserPayload),
}

/// Requests rejected before any downstream call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    Malformed(String),

    #[error("refresh token is required")]
    MissingRefreshToken,

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl Envelope {
    /// A JSON `null` body decodes to an empty envelope. Anything after the
    /// top-level value other than whitespace is malformed.
    pub fn decode(body: &[u8]) -> Result<Self, DispatchError> {
        serde_json::from_slice::<Option<Envelope>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| DispatchError::Malformed(e.to_string()))
    }
}

impl TryFrom<Envelope> for Action {
    type Error = DispatchError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        match envelope.action.as_deref().unwrap_or_default() {
            // Missing credentials are forwarded as-is, the auth service validates them
            "auth" => Ok(Action::Authenticate(envelope.auth.unwrap_or_default())),
            "refresh" => envelope
                .refresh_token
                .filter(|token| !token.is_empty())
                .map(Action::Refresh)
                .ok_or(DispatchError::MissingRefreshToken),
            "register" => Ok(Action::Register(envelope.register.unwrap_or_default())),
            other => Err(DispatchError::UnknownAction(other.to_string())),
        }
    }
}

impl Action {
    /// Decode a raw body straight into an action
    pub fn from_body(body: &[u8]) -> Result<Self, DispatchError> {
        Envelope::decode(body)?.try_into()
    }

    pub fn operation(&self) -> Operation {
        match self {
            Action::Authenticate(_) => Operation::Authenticate,
            Action::Refresh(_) => Operation::Refresh,
            Action::Register(_) => Operation::Register,
        }
    }
}
