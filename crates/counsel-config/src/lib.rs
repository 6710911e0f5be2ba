mod api_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod session_config;
mod storage_config;

pub use api_config::ApiConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use session_config::SessionConfig;
pub use storage_config::StorageConfig;

#[cfg(test)]
mod tests;

pub const CONFIG_DIR_ENV: &str = "COUNSEL_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".counsel";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

// 30 minutes / 10 consecutive failures before /auth/me failures stop being tolerated
const DEFAULT_GRACE_PERIOD_SECS: u64 = 30 * 60;
const MAX_GRACE_PERIOD_SECS: u64 = 24 * 60 * 60;
const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;
const MIN_MAX_CONSECUTIVE_FAILURES: u32 = 1;
const MAX_MAX_CONSECUTIVE_FAILURES: u32 = 100;
const DEFAULT_VERIFY_CACHE_SECS: u64 = 10;
const MAX_VERIFY_CACHE_SECS: u64 = 300;
const DEFAULT_AUTH_ERROR_MARKERS: [&str; 3] = ["unauthorized", "access denied", "token"];

const DEFAULT_STORAGE_FILENAME: &str = "storage.json";

const DEFAULT_LOG_LEVEL_STRING: &str = "warn";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
const DEFAULT_LOG_COLORED: bool = true;
