use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Process-level settings. Generation and persona defaults live in
/// [`crate::tutor::PipelineConfig`] and [`crate::services::LLMProvider::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Directory of curriculum `*.json` documents loaded at startup.
    pub curriculum_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            curriculum_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset, blank or unparsable values keep their defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: parse_or(value("HOST"), defaults.host),
            port: parse_or(value("PORT"), defaults.port),
            log_level: value("RUST_LOG").unwrap_or(defaults.log_level),
            curriculum_dir: value("CURRICULUM_DIR").map(PathBuf::from),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, fallback: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
}
