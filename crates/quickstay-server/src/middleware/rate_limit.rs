//! Rate limiting middleware using tower-governor
//!
//! Requests are keyed by peer IP, so the router must be served with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::config::RateLimitConfig;

/// How often stale per-IP buckets are dropped
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Replenishment period in milliseconds and burst size for a per-minute budget
fn quota(requests_per_minute: u64) -> (u64, u32) {
    let rpm = requests_per_minute.max(1);
    // e.g. 1000/min: one token every 60ms, up to 1000 queued
    let replenish_ms = (60_000 / rpm).max(1);
    let burst = u32::try_from(rpm).unwrap_or(u32::MAX);
    (replenish_ms, burst)
}

/// Wrap `router` in the governor layer when rate limiting is enabled.
pub fn apply(router: Router, config: &RateLimitConfig) -> anyhow::Result<Router> {
    if !config.enabled {
        tracing::info!("Rate limiting disabled");
        return Ok(router);
    }

    let (replenish_ms, burst) = quota(config.requests_per_minute);

    let governor = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_ms)
            .burst_size(burst)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );

    let limiter = governor.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    tracing::info!(
        requests_per_minute = config.requests_per_minute,
        "Rate limiting enabled"
    );

    Ok(router.layer(GovernorLayer { config: governor }))
}
