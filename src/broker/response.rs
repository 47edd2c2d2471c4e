use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::models::{TokenPayload, UserPayload};

/// Response envelope shared by every broker endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// `data` for auth and refresh
#[derive(Debug, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<TokenPayload> for TokenData {
    fn from(tokens: TokenPayload) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
        }
    }
}

/// `data` for register; timestamps as RFC 3339 UTC, null when missing
#[derive(Debug, Serialize)]
pub struct UserData {
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub id: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<UserPayload> for UserData {
    fn from(user: UserPayload) -> Self {
        Self {
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active.unwrap_or_default(),
            is_superuser: user.is_superuser.unwrap_or_default(),
            id: user.id.unwrap_or_default(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WireTimestamp;
    use serde_json::json;

    #[test]
    fn test_failure_has_no_data() {
        let body = serde_json::to_value(ApiResponse::failure("unknown action: x")).unwrap();
        assert_eq!(body, json!({"error": true, "message": "unknown action: x"}));
    }

    #[test]
    fn test_user_data_rendering() {
        let user = UserPayload {
            email: "u@x.com".to_string(),
            is_active: Some(true),
            id: Some(3),
            created_at: WireTimestamp::parse("2024-06-01T08:00:00.250000").unwrap(),
            ..Default::default()
        };

        let body = serde_json::to_value(ApiResponse::success("ok", UserData::from(user))).unwrap();
        assert_eq!(
            body,
            json!({
                "error": false,
                "message": "ok",
                "data": {
                    "email": "u@x.com",
                    "full_name": null,
                    "is_active": true,
                    "is_superuser": false,
                    "id": 3,
                    "created_at": "2024-06-01T08:00:00.250Z",
                    "updated_at": null
                }
            })
        );
    }
}
