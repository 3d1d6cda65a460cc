//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all `/api` handlers
//! - Wire up middleware (tracing, limits, request ID, inbound timeout)
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::FromRef,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::backend::BackendForwarder;
use crate::config::GatewayConfig;
use crate::http::handlers::{auth, billing, chat, message, users};
use crate::http::request::{request_id_header, MakeUuidRequestId};
use crate::session::CookiePolicy;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<BackendForwarder>,
    pub config: Arc<GatewayConfig>,
    pub cookies: CookiePolicy,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let forwarder = Arc::new(BackendForwarder::new(&config.backend)?);
        let cookies = CookiePolicy::from_config(&config);
        Ok(Self {
            forwarder,
            config: Arc::new(config),
            cookies,
        })
    }
}

impl FromRef<AppState> for CookiePolicy {
    fn from_ref(state: &AppState) -> Self {
        state.cookies
    }
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_check_handler))
            // Chats
            .route("/api/chat", get(chat::list_chats))
            .route("/api/chat/create", post(chat::create_chat))
            .route("/api/chat/limit", get(chat::get_limit))
            .route("/api/chat/{id}", get(chat::get_chat).delete(chat::delete_chat))
            .route(
                "/api/chat/{id}/message",
                get(message::list_messages).post(message::send_message),
            )
            // Auth
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/logout", post(auth::logout))
            .route("/api/auth/google", post(auth::google_init))
            .route("/api/auth/google/callback", post(auth::google_callback))
            .route("/api/auth/session", get(auth::session_info))
            // Users
            .route(
                "/api/users/profile",
                get(users::get_profile).put(users::update_profile),
            )
            // Billing
            .route("/api/billing/create-portal", post(billing::create_portal))
            .route(
                "/api/billing/create-checkout-session",
                post(billing::create_checkout_session),
            )
            .route("/api/billing/pricing", get(billing::pricing))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(SetRequestIdLayer::new(request_id_header(), MakeUuidRequestId))
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            environment = ?self.config.environment,
            chat_auth_required = self.config.chat.auth_required,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Health check handler
async fn health_check_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
