//! MediBuddy core — personal medication reminders, held entirely on the
//! user's device.
//!
//! Medicines carry one-time, regular (weekday-filtered), or date-bounded
//! course schedules. A durable single-key store holds the collection; a
//! pure evaluator decides which alarms are due at a given minute; a
//! background poll loop dispatches at most one notification per
//! (medicine, alarm, minute) through an injected send capability.

pub mod config;
pub mod db;
pub mod models;
pub mod notify;
pub mod queries;
pub mod schedule;
pub mod service;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host process. RUST_LOG overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
