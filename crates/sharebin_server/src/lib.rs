//! HTTP server wiring for ShareBin (request pipeline, handlers, and state).

/// API information document.
pub mod docs;
/// HTTP error mapping for API handlers.
pub mod error;
/// Extractors with JSON rejections.
pub mod extract;
/// HTTP handlers for paste, user, and redirect endpoints.
pub mod handlers;
/// Per-IP rate limiting.
pub mod ratelimit;
/// Signed cookie sessions.
pub mod session;

pub use sharebin_core::{
    config, db, models, password, validate_paste, AppError, Config, Database, DEFAULT_PORT,
};

use axum::{
    extract::{DefaultBodyLimit, MatchedPath},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use docs::ApiDocumentation;
use error::HttpError;
use ratelimit::RateLimitState;
use session::SessionRecords;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'";

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub docs: Arc<ApiDocumentation>,
    pub rate_limit: RateLimitState,
    pub sessions: SessionRecords,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Persistence handle.
    ///
    /// # Returns
    /// A new [`AppState`] with the limiter and documentation built from
    /// `config`, and the administrator account created when `ADMIN_TOKEN`
    /// is configured.
    pub fn new(config: Config, db: Database) -> Self {
        if config.rate_limit.store_url.is_some() {
            tracing::warn!(
                "LIMITER_STORE_URL is set but only in-process rate limiting is available"
            );
        }
        match db.users.seed_admin(&config.admin) {
            Ok(true) => tracing::info!(
                username = %config.admin.username,
                "Created administrator account"
            ),
            Ok(false) => {}
            Err(err) => tracing::warn!("Failed to create administrator account: {}", err),
        }
        Self {
            db: Arc::new(db),
            rate_limit: RateLimitState::new(&config.rate_limit),
            config: Arc::new(config),
            docs: Arc::new(ApiDocumentation::default()),
            sessions: SessionRecords::default(),
        }
    }
}

async fn not_found() -> HttpError {
    HttpError(AppError::NotFound)
}

/// Give the router's empty 405 responses a JSON body, keeping `Allow`.
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rendered = HttpError(AppError::MethodNotAllowed).into_response();
    if let Some(allow) = allow {
        rendered.headers_mut().insert(header::ALLOW, allow);
    }
    rendered
}

/// Route template for logging. Concrete paths carry safety tokens and
/// query strings carry passwords, so neither is recorded.
fn route_label<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("<unmatched>")
}

fn request_span<B>(request: &Request<B>) -> tracing::Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        route = route_label(request),
    )
}

fn routes(state: AppState) -> Router {
    if state.config.maintenance {
        return Router::new().fallback(handlers::maintenance::maintenance_page);
    }

    Router::new()
        .route("/api/paste", post(handlers::paste::create_paste))
        .route("/api/paste/:id", get(handlers::paste::get_paste))
        .route(
            "/api/paste/:id/raw/:index",
            get(handlers::paste::get_raw_file),
        )
        .route(
            "/api/security/delete/:token",
            delete(handlers::paste::delete_by_safety_token),
        )
        .route(
            "/api/session/pastes",
            get(handlers::paste::list_session_pastes),
        )
        .route("/api/documentation", get(handlers::documentation))
        .route("/user", get(handlers::user::get_self))
        .route("/user/token-gen", post(handlers::user::regenerate_token))
        // Legacy paths
        .route("/docs", get(handlers::redirect::documentation))
        .route("/documentation", get(handlers::redirect::documentation))
        .route("/documents", post(handlers::redirect::legacy_documents))
        .route("/api/documents", post(handlers::redirect::legacy_documents))
        .fallback(not_found)
        .layer(axum::middleware::map_response(method_not_allowed))
        .with_state(state)
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{}:{}", host, cors_port)).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Create the application router with the full request pipeline.
///
/// Requests pass through tracing, then the rate limiter, then the session
/// layer before reaching either the routes or, in maintenance mode, the
/// maintenance page.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let body_limit = state.config.max_body_size();
    let rate_limit = state.rate_limit.clone();
    let sessions = session::session_layer(&state.config.session, state.sessions.clone());

    routes(state).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
            .layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(CONTENT_SECURITY_POLICY),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(cors_layer(allow_public_access, cors_port))
            .layer(CompressionLayer::new())
            .layer(axum::middleware::from_fn_with_state(
                rate_limit,
                ratelimit::rate_limit_middleware,
            ))
            .layer(sessions)
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Periodically drop expired pastes from the store.
pub fn spawn_expiry_purge(db: Arc<Database>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match db.pastes.purge_expired(chrono::Utc::now()) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired pastes"),
                Err(err) => tracing::warn!("Failed to purge expired pastes: {}", err),
            }
        }
    })
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// Peer addresses are attached to every request for per-IP rate limiting.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}
