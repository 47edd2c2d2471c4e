use serde::{Deserialize, Serialize};

use super::WireTimestamp;

/// Credentials forwarded to `POST /token`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request and the user record returned by `POST /register`.
///
/// The server-assigned fields only show up in responses; when unset they are
/// left out of the outgoing request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "WireTimestamp::is_unset")]
    pub created_at: WireTimestamp,
    #[serde(default, skip_serializing_if = "WireTimestamp::is_unset")]
    pub updated_at: WireTimestamp,
}

/// Token pair returned by both `/token` and `/refresh-token`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Body of `POST /refresh-token`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
