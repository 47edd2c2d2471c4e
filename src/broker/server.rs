use crate::broker::config::BrokerConfig;
use crate::broker::upstream::AuthServiceClient;
use crate::error::{AppError, AppResult};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Envelopes are tiny; anything larger is not a broker request
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<AuthServiceClient>,
}

/// Build the broker router
pub fn build_router(state: AppState, logging_enabled: bool) -> Router {
    use crate::broker::{handlers, middleware};

    let mut app = Router::new()
        .route("/handle", post(handlers::handle_submission))
        .route("/health", get(handlers::health_check_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    if logging_enabled {
        app = app
            .layer(axum::middleware::from_fn(middleware::logging_middleware))
            .layer(TraceLayer::new_for_http());
    }

    app.layer(middleware::recover_layer())
        .layer(middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Bind and start serving in a background task
    pub async fn start(
        config: &BrokerConfig,
        upstream: Arc<AuthServiceClient>,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let state = AppState { upstream };
        let app = build_router(state, config.logging_enabled);

        // Bind address
        let addr = format!("{}:{}", config.get_bind_address(), config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Broker service started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                // A dropped connection drops the handler future and its outbound call
                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Broker service stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Address actually bound, useful with port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
