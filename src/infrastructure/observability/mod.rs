//! Observability - cache metrics

pub mod metrics;

pub use metrics::{record_cache_lookup, record_cache_write, record_connection_state, LookupOutcome};
