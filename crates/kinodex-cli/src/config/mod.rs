//! Application configuration (TOML).

mod config;
mod paths;

pub use config::{ApiConfig, AppConfig, SearchConfig};
pub use paths::resolve_config_path;
