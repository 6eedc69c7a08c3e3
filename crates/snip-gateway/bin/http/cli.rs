use clap::{Parser, ValueEnum};
use snip_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::NonZeroU32;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const BASE_SHORT_URL_ENV: &str = "SNIP_BASE_SHORT_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNIP_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SNIP_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "SNIP_MYSQL_MAX_CONNECTIONS";
pub const CACHE_BACKEND_ENV: &str = "SNIP_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "SNIP_REDIS_URL";
pub const CACHE_TTL_SECS_ENV: &str = "SNIP_CACHE_TTL_SECS";
pub const CACHE_CAPACITY_ENV: &str = "SNIP_CACHE_CAPACITY";
pub const RATE_LIMIT_PER_SECOND_ENV: &str = "SNIP_RATE_LIMIT_PER_SECOND";
pub const RATE_LIMIT_BURST_ENV: &str = "SNIP_RATE_LIMIT_BURST";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_SHORT_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::Memory => write!(f, "memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip-gateway", about = "HTTP URL shortener")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of every returned short URL.
    #[arg(long, env = BASE_SHORT_URL_ENV, default_value = DEFAULT_BASE_SHORT_URL)]
    pub base_short_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = MYSQL_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub mysql_max_connections: u32,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::Memory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    /// Lifetime of every cache entry.
    #[arg(long, env = CACHE_TTL_SECS_ENV, default_value_t = 24 * 60 * 60)]
    pub cache_ttl_secs: u64,

    /// Maximum entries of the in-memory cache.
    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub cache_capacity: u64,

    #[arg(long, env = RATE_LIMIT_PER_SECOND_ENV, default_value = "1")]
    pub rate_limit_per_second: NonZeroU32,

    #[arg(long, env = RATE_LIMIT_BURST_ENV, default_value = "5")]
    pub rate_limit_burst: NonZeroU32,

    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mysql_backend_requires_dsn() {
        let result = Cli::try_parse_from(["snip-gateway", "--storage", "mysql"]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["snip-gateway"]).unwrap();
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, CacheBackendArg::Memory);
        assert_eq!(cli.cache_ttl_secs, 86_400);
        assert_eq!(cli.rate_limit_burst.get(), 5);
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }
}
