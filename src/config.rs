use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediBuddy";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known key the medicine collection is persisted under.
pub const MEDICINES_STORE_KEY: &str = "medibuddy-medicines";

/// Poll loop cadence: evaluate all alarms once a minute.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Stock count at or below which a medicine counts as low on stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/MediBuddy/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediBuddy")
}

/// Get the path of the medicine database
pub fn database_path() -> PathBuf {
    app_data_dir().join("medibuddy.db")
}
