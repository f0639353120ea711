use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;

use super::transportapi::TransportApiError;
use super::types::RawDeparture;

/// The last successful payload for one station plus its fetch time.
///
/// Replaced wholesale on a successful fetch, never field-by-field, so readers
/// only ever see a fully-formed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StationSnapshot {
    pub payload: Option<Vec<RawDeparture>>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub api_limit_exceeded: bool,
}

impl StationSnapshot {
    pub fn is_stale(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        match self.fetched_at {
            Some(fetched_at) => now - fetched_at > freshness,
            None => true,
        }
    }
}

/// Per-station snapshots; routes guard the map with a mutex so concurrent
/// dashboard sessions share one cache and one in-flight fetch per station.
pub type SnapshotMap = HashMap<String, StationSnapshot>;

/// How a fetch-or-reuse pass resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh data fetched and stored.
    Refreshed,
    /// Cache was within the freshness window; no network call was made.
    CacheHit,
    /// Rate limited upstream; serving whatever the cache holds.
    StaleRateLimited,
    /// 200 with an unusable body; cache untouched.
    StaleMalformed,
    /// Network or API failure; cache untouched.
    StaleFetchFailed,
}

impl FetchOutcome {
    /// Inline notice for the dashboard, `None` when nothing is degraded.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            FetchOutcome::Refreshed | FetchOutcome::CacheHit => None,
            FetchOutcome::StaleRateLimited => {
                Some("API rate limit exceeded; showing cached departures.")
            }
            FetchOutcome::StaleMalformed => {
                Some("Upstream sent a malformed response; showing cached departures.")
            }
            FetchOutcome::StaleFetchFailed => {
                Some("Could not fetch live train data; showing cached departures.")
            }
        }
    }
}

/// Core staleness policy: call `fetch` only when the snapshot has no
/// timestamp or its age exceeds `freshness`; otherwise the cached payload is
/// returned untouched. Every failure leaves the snapshot's payload as it was.
///
/// `now` is passed in rather than read from the system clock.
pub async fn fetch_or_refresh<F, Fut>(
    snapshot: &mut StationSnapshot,
    now: DateTime<Utc>,
    freshness: Duration,
    fetch: F,
) -> FetchOutcome
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<RawDeparture>, TransportApiError>>,
{
    if !snapshot.is_stale(now, freshness) {
        return FetchOutcome::CacheHit;
    }

    match fetch().await {
        Ok(departures) => {
            *snapshot = StationSnapshot {
                payload: Some(departures),
                fetched_at: Some(now),
                api_limit_exceeded: false,
            };
            FetchOutcome::Refreshed
        }
        Err(TransportApiError::RateLimited) => {
            snapshot.api_limit_exceeded = true;
            FetchOutcome::StaleRateLimited
        }
        Err(TransportApiError::MalformedResponse(reason)) => {
            tracing::warn!(%reason, "malformed live departures body, keeping cache");
            FetchOutcome::StaleMalformed
        }
        Err(err) => {
            tracing::warn!(error = %err, "live departures fetch failed, keeping cache");
            FetchOutcome::StaleFetchFailed
        }
    }
}
