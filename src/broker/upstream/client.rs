// Auth service client
// One POST per call, no retry, no caching

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{extract_detail, ForwardError};
use crate::models::{AuthPayload, RefreshRequest, TokenPayload, UserPayload};

/// Outcome of a single downstream call
pub type DownstreamResult<T> = Result<T, ForwardError>;

/// Downstream operations and their call shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Authenticate,
    Refresh,
    Register,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::Authenticate => "/token",
            Operation::Refresh => "/refresh-token",
            Operation::Register => "/register",
        }
    }

    /// The only status treated as success
    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::Authenticate | Operation::Refresh => StatusCode::OK,
            Operation::Register => StatusCode::CREATED,
        }
    }

    /// Name used in synthesized failure messages
    pub fn name(self) -> &'static str {
        match self {
            Operation::Authenticate => "authentication",
            Operation::Refresh => "token refresh",
            Operation::Register => "registration",
        }
    }
}

pub struct AuthServiceClient {
    http_client: Client,
    base_url: String,
}

impl AuthServiceClient {
    /// `http_client` is shared by every in-flight request; `base_url` has no
    /// trailing slash.
    pub fn new(base_url: impl Into<String>, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    /// `POST /token`
    pub async fn authenticate(&self, payload: &AuthPayload) -> DownstreamResult<TokenPayload> {
        self.call(Operation::Authenticate, payload).await
    }

    /// `POST /refresh-token`
    pub async fn refresh(&self, refresh_token: &str) -> DownstreamResult<TokenPayload> {
        self.call(Operation::Refresh, &RefreshRequest { refresh_token })
            .await
    }

    /// `POST /register`
    pub async fn register(&self, payload: &UserPayload) -> DownstreamResult<UserPayload> {
        self.call(Operation::Register, payload).await
    }

    async fn call<Req, Resp>(&self, operation: Operation, payload: &Req) -> DownstreamResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(payload).map_err(|e| ForwardError::Encode(e.to_string()))?;
        let url = self.build_url(operation);
        debug!("Forwarding {} to {}", operation.name(), url);

        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("{} request to {} failed: {}", operation.name(), url, e);
                ForwardError::Transport(e.to_string())
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ForwardError::Io(e.to_string()))?;

        let json: Value =
            serde_json::from_slice(&bytes).map_err(|e| ForwardError::Decode(e.to_string()))?;

        if status != operation.success_status() {
            let message = extract_detail(&json).unwrap_or_else(|| {
                format!(
                    "{} failed with status code: {}",
                    operation.name(),
                    status.as_u16()
                )
            });
            warn!(
                "{} rejected by auth service ({}): {}",
                operation.name(),
                status,
                message
            );
            return Err(ForwardError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_value(json).map_err(|e| ForwardError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::upstream::error::ErrorKind;
    use crate::models::WireTimestamp;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn client_for(server: &MockServer) -> AuthServiceClient {
        AuthServiceClient::new(server.base_url(), Client::new())
    }

    fn credentials() -> AuthPayload {
        AuthPayload {
            email: "u@x.com".to_string(),
            password: "p".to_string(),
        }
    }

    #[test]
    fn test_build_url() {
        let client = AuthServiceClient::new("http://auth:8000/api/v1/auth", Client::new());
        assert_eq!(
            client.build_url(Operation::Authenticate),
            "http://auth:8000/api/v1/auth/token"
        );
        assert_eq!(
            client.build_url(Operation::Refresh),
            "http://auth:8000/api/v1/auth/refresh-token"
        );
        assert_eq!(
            client.build_url(Operation::Register),
            "http://auth:8000/api/v1/auth/register"
        );
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .header("content-type", "application/json")
                    .json_body(json!({"email": "u@x.com", "password": "p"}));
                then.status(200).json_body(json!({
                    "access_token": "a",
                    "refresh_token": "b",
                    "token_type": "bearer"
                }));
            })
            .await;

        let tokens = client_for(&server).authenticate(&credentials()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "b");
        assert_eq!(tokens.token_type, "bearer");
    }

    #[tokio::test]
    async fn test_rejection_uses_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401)
                    .json_body(json!({"detail": "invalid credentials"}));
            })
            .await;

        let err = client_for(&server)
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[tokio::test]
    async fn test_rejection_without_detail_is_synthesized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/refresh-token");
                then.status(503).json_body(json!({}));
            })
            .await;

        let err = client_for(&server).refresh("r1").await.unwrap_err();
        assert_eq!(err.to_string(), "token refresh failed with status code: 503");
    }

    #[tokio::test]
    async fn test_refresh_sends_token_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/refresh-token")
                    .json_body(json!({"refresh_token": "r1"}));
                then.status(200).json_body(json!({
                    "access_token": "a2",
                    "refresh_token": "r2",
                    "token_type": "bearer"
                }));
            })
            .await;

        let tokens = client_for(&server).refresh("r1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(tokens.refresh_token, "r2");
    }

    #[tokio::test]
    async fn test_register_requires_created() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/register");
                then.status(200).json_body(json!({"email": "u@x.com"}));
            })
            .await;

        let err = client_for(&server)
            .register(&UserPayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.to_string(), "registration failed with status code: 200");
    }

    #[tokio::test]
    async fn test_register_success_decodes_user() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/register")
                    .json_body(json!({"email": "u@x.com", "password": "longpassword", "full_name": null}));
                then.status(201).json_body(json!({
                    "email": "u@x.com",
                    "full_name": null,
                    "is_active": true,
                    "is_superuser": false,
                    "id": 12,
                    "created_at": "2024-06-01T08:00:00.250000",
                    "updated_at": "2024-06-01T08:00:00.250000"
                }));
            })
            .await;

        let request = UserPayload {
            email: "u@x.com".to_string(),
            password: "longpassword".to_string(),
            ..Default::default()
        };
        let user = client_for(&server).register(&request).await.unwrap();

        assert_eq!(user.id, Some(12));
        assert_eq!(
            user.created_at,
            WireTimestamp::parse("2024-06-01T08:00:00.25").unwrap()
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(502).body("<html>Bad Gateway</html>");
            })
            .await;

        let err = client_for(&server)
            .authenticate(&credentials())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_wrong_success_shape_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).json_body(json!({"valid": true}));
            })
            .await;

        let err = client_for(&server)
            .authenticate(&credentials())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_truncated_body_is_io_error() {
        let base_url = crate::broker::upstream::test_support::truncated_body_server().await;
        let client = AuthServiceClient::new(base_url, Client::new());

        let err = client.authenticate(&credentials()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("error reading response body"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Reserve a port, then free it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AuthServiceClient::new(format!("http://{}", addr), Client::new());
        let err = client.authenticate(&credentials()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err
            .to_string()
            .starts_with("error making request to auth service"));
    }
}
