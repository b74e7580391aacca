//! Global per-IP rate limiting applied before routing.
//!
//! One token bucket per client IP. The bucket holds `requests` tokens and
//! refills one token every `window / requests`, so a client may spend the
//! whole ceiling at once and then waits for the window to replenish it.
//!
//! The client key is the peer address from `ConnectInfo`. Forwarded headers
//! are not trusted. Requests without connection info share one bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use serde_json::json;
use sharebin_core::config::RateLimitConfig;
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

/// `None` is the shared bucket for requests without a peer address.
type ClientKey = Option<IpAddr>;

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    inner: Option<Arc<RateLimitStateInner>>,
}

struct RateLimitStateInner {
    limiter: DefaultKeyedRateLimiter<ClientKey>,
    ignore_localhost: bool,
    connect_info_warned: AtomicBool,
}

/// Rejection returned when a client exceeds its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitError {
    pub retry_after_secs: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": format!(
                "Rate limit exceeded. Retry after {} seconds.",
                self.retry_after_secs
            ),
        });
        (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, self.retry_after_secs.to_string())],
            Json(body),
        )
            .into_response()
    }
}

/// Smallest refill interval; finer periods truncate to zero.
const MIN_REFILL_PERIOD: Duration = Duration::from_nanos(1);

fn build_quota(config: &RateLimitConfig) -> Option<Quota> {
    let requests = NonZeroU32::new(config.requests)?;
    if config.window_secs == 0 {
        return None;
    }
    let window = Duration::from_secs(config.window_secs);
    let quota = Quota::with_period((window / requests.get()).max(MIN_REFILL_PERIOD))?;
    Some(quota.allow_burst(requests))
}

impl RateLimitState {
    /// Build limiter state from configuration.
    ///
    /// A zero request ceiling or a zero-length window disables limiting.
    pub fn new(config: &RateLimitConfig) -> Self {
        let Some(quota) = build_quota(config) else {
            tracing::info!("Rate limiting disabled");
            return Self { inner: None };
        };
        Self {
            inner: Some(Arc::new(RateLimitStateInner {
                limiter: RateLimiter::keyed(quota),
                ignore_localhost: config.ignore_localhost,
                connect_info_warned: AtomicBool::new(false),
            })),
        }
    }

    /// Limiter that lets every request through.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Whether any requests are being counted.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Count one request for `client`.
    ///
    /// # Errors
    /// Returns [`RateLimitError`] with the number of seconds until the next
    /// request would be admitted.
    pub fn check(&self, client: ClientKey) -> Result<(), RateLimitError> {
        let Some(inner) = &self.inner else {
            return Ok(());
        };
        if inner.ignore_localhost && client.is_some_and(|ip| ip.is_loopback()) {
            return Ok(());
        }
        inner.limiter.check_key(&client).map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            RateLimitError {
                retry_after_secs: wait.as_secs() + 1,
            }
        })
    }

    /// Forget buckets that have fully refilled.
    pub fn retain_recent(&self) {
        if let Some(inner) = &self.inner {
            inner.limiter.retain_recent();
            inner.limiter.shrink_to_fit();
        }
    }

    fn warn_connect_info_missing(&self) {
        if let Some(inner) = &self.inner {
            if !inner.connect_info_warned.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    "ConnectInfo not available for rate limiting; all requests share one bucket"
                );
            }
        }
    }
}

fn client_ip(req: &Request<Body>) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

/// Per-IP rate limiting middleware.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !rate_limit.is_enabled() {
        return next.run(req).await;
    }

    let client = client_ip(&req);
    if client.is_none() {
        rate_limit.warn_connect_info_missing();
    }

    match rate_limit.check(client) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::debug!(?client, retry_after = err.retry_after_secs, "Rate limited");
            err.into_response()
        }
    }
}

/// Periodically drop idle buckets so memory stays bounded.
pub fn spawn_cleanup_task(state: RateLimitState, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            state.retain_recent();
        }
    })
}
