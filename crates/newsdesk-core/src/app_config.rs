use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub attribution_path: PathBuf,
    pub storage_base_url: String,
    pub feed_prefix: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub storage_request_timeout_secs: u64,
    pub storage_max_retries: u32,
    pub storage_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("attribution_path", &self.attribution_path)
            .field("database_url", &"[redacted]")
            .field("storage_base_url", &self.storage_base_url)
            .field("feed_prefix", &self.feed_prefix)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "storage_request_timeout_secs",
                &self.storage_request_timeout_secs,
            )
            .field("storage_max_retries", &self.storage_max_retries)
            .field(
                "storage_retry_backoff_base_secs",
                &self.storage_retry_backoff_base_secs,
            )
            .finish()
    }
}
