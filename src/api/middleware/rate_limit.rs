//! Per-client rate limiting using a token bucket.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Public endpoints: 2 requests per second, bursts of 100.
pub const PUBLIC: Quota = Quota {
    per_second: 2,
    burst_size: 100,
};

/// Credential endpoints (register, login, refresh): 1 per second, bursts of 10.
pub const CREDENTIALS: Quota = Quota {
    per_second: 1,
    burst_size: 10,
};

/// Applies `quota` to every route of `router`, keyed by client IP.
///
/// When `behind_proxy` is set the key comes from `X-Forwarded-For` /
/// `X-Real-IP` / `Forwarded`; otherwise from the socket peer address, which
/// requires the server to run with connect info.
///
/// Requests over the limit receive `429 Too Many Requests`.
pub fn apply(router: Router<AppState>, quota: Quota, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(governor_layer(SmartIpKeyExtractor, quota))
    } else {
        router.layer(governor_layer(PeerIpKeyExtractor, quota))
    }
}

fn governor_layer<K>(
    key_extractor: K,
    quota: Quota,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
