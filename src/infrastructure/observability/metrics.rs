//! Cache metrics
//!
//! Recorded through the `metrics` facade; whichever recorder the host
//! process installs receives them. Without a recorder these are no-ops.

use metrics::{counter, gauge};

use crate::domain::cache::{CacheWrite, ConnectionState};

/// Result of an entity cache lookup as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Miss,
    Unavailable,
    /// Entry present but unparseable, served as a miss
    Corrupt,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Unavailable => "unavailable",
            Self::Corrupt => "corrupt",
        }
    }
}

pub fn record_cache_lookup(namespace: &str, outcome: LookupOutcome) {
    counter!(
        "entity_cache_lookups_total",
        "namespace" => namespace.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_cache_write(namespace: &str, op: &'static str, outcome: CacheWrite) {
    let outcome = match outcome {
        CacheWrite::Applied => "applied",
        CacheWrite::Unavailable => "unavailable",
    };

    counter!(
        "entity_cache_writes_total",
        "namespace" => namespace.to_string(),
        "op" => op,
        "outcome" => outcome
    )
    .increment(1);
}

/// Publishes the connection state as a gauge (0 disconnected .. 3 disabled)
pub fn record_connection_state(state: ConnectionState) {
    gauge!("cache_connection_state").set(state as u8 as f64);
}
