//! Shared integration-test server bootstrap helpers.

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    Router,
};
use axum_test::TestServer;
use sharebin_server::{create_app, AppState, Config, Database};
use std::net::SocketAddr;

/// Defaults with rate limiting off and a fixed session secret.
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.port = 0;
    config.rate_limit.requests = 0;
    config.session.secret = Some("integration-test-secret".to_string());
    config
}

pub(crate) fn test_state(config: Config) -> AppState {
    AppState::new(config, Database::new())
}

pub(crate) fn test_server_for_state(state: AppState) -> TestServer {
    TestServer::builder()
        .save_cookies()
        .build(create_app(state, false))
        .expect("server")
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, AppState) {
    let state = test_state(config);
    (test_server_for_state(state.clone()), state)
}

pub(crate) fn setup_test_server() -> (TestServer, AppState) {
    test_server_for_config(test_config())
}

/// Attach a fixed peer address, as `serve_router` does for real connections.
pub(crate) fn with_peer(app: Router, peer: SocketAddr) -> Router {
    app.layer(axum::middleware::from_fn(
        move |mut req: Request, next: Next| async move {
            req.extensions_mut().insert(ConnectInfo(peer));
            next.run(req).await
        },
    ))
}
