//! Environment-driven application configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Environment abstraction for configuration lookups, so tests can supply a
/// stub environment without unsafe env var mutation.
pub trait ConfigEnv {
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfigEnv;

impl ConfigEnv for DefaultConfigEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Application configuration: connection strings, bind address, and the
/// resilience kernel's per-adapter tunables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub kafka_bootstrap_servers: String,
    pub bind_addr: SocketAddr,
    pub db_pool_max_size: u32,
    pub redis_pool_max_size: u32,
    pub bulkhead_read_capacity: usize,
    pub bulkhead_write_capacity: usize,
    pub bulkhead_audit_capacity: usize,
    pub drain_timeout: Duration,
}

impl AppConfig {
    const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
    const DEFAULT_REDIS_POOL_MAX_SIZE: u32 = 10;
    const DEFAULT_BULKHEAD_READ_CAPACITY: usize = 64;
    const DEFAULT_BULKHEAD_WRITE_CAPACITY: usize = 16;
    const DEFAULT_BULKHEAD_AUDIT_CAPACITY: usize = 8;
    const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);
    const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";

    /// Load configuration from the real process environment.
    ///
    /// # Panics
    /// Panics if `DATABASE_URL`, `REDIS_URL`, or `KAFKA_BOOTSTRAP_SERVERS`
    /// are unset, or if `BIND_ADDR` is set to an unparseable address.
    pub fn from_env() -> Self {
        Self::from_env_with(&DefaultConfigEnv)
    }

    /// Load configuration from a custom environment source.
    pub fn from_env_with(env: &impl ConfigEnv) -> Self {
        let database_url = env
            .string("DATABASE_URL")
            .expect("DATABASE_URL must be set");
        let redis_url = env.string("REDIS_URL").expect("REDIS_URL must be set");
        let kafka_bootstrap_servers = env
            .string("KAFKA_BOOTSTRAP_SERVERS")
            .expect("KAFKA_BOOTSTRAP_SERVERS must be set");
        let bind_addr = env
            .string("BIND_ADDR")
            .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let db_pool_max_size = Self::parsed_or(env, "DB_POOL_MAX_SIZE", Self::DEFAULT_DB_POOL_MAX_SIZE);
        let redis_pool_max_size =
            Self::parsed_or(env, "REDIS_POOL_MAX_SIZE", Self::DEFAULT_REDIS_POOL_MAX_SIZE);
        let bulkhead_read_capacity = Self::parsed_or(
            env,
            "BULKHEAD_READ_CAPACITY",
            Self::DEFAULT_BULKHEAD_READ_CAPACITY,
        );
        let bulkhead_write_capacity = Self::parsed_or(
            env,
            "BULKHEAD_WRITE_CAPACITY",
            Self::DEFAULT_BULKHEAD_WRITE_CAPACITY,
        );
        let bulkhead_audit_capacity = Self::parsed_or(
            env,
            "BULKHEAD_AUDIT_CAPACITY",
            Self::DEFAULT_BULKHEAD_AUDIT_CAPACITY,
        );
        let drain_timeout = env
            .string("DRAIN_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Self::DEFAULT_DRAIN_TIMEOUT);

        Self {
            database_url,
            redis_url,
            kafka_bootstrap_servers,
            bind_addr,
            db_pool_max_size,
            redis_pool_max_size,
            bulkhead_read_capacity,
            bulkhead_write_capacity,
            bulkhead_audit_capacity,
            drain_timeout,
        }
    }

    fn parsed_or<T: std::str::FromStr>(env: &impl ConfigEnv, name: &str, default: T) -> T {
        env.string(name)
            .and_then(|s| s.parse::<T>().ok())
            .unwrap_or(default)
    }
}
