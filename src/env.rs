use dotenvy::dotenv;
use log::{error, info, warn};
use std::{env as stdenv, path::Path, str::FromStr, time::Duration};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CORS_ORIGINS_FILE: &str = ".env_cors";
pub const DEFAULT_RESTART_DELAY_MS: u64 = 1000;

/// Loads `.env` from the working directory, logging where it looked.
pub fn load_env_file() {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_path = current_dir.join(".env");

    if dotenv().is_err() {
        error!(
            ".env file not found. Expected it at: {}",
            env_path.display()
        );
    } else {
        info!(".env loading at: {}", env_path.display());
    }
}

/// Settings of the datastorage server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub bind_addr: String,
    /// Upload cap in bytes. `None` accepts uploads of any size.
    pub max_upload_bytes: Option<usize>,
    pub cors_origins_file: String,
    pub restart_delay: Duration,
    /// Failed runs before the server binary gives up. 0 retries forever.
    pub max_restarts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            max_upload_bytes: None,
            cors_origins_file: DEFAULT_CORS_ORIGINS_FILE.to_string(),
            restart_delay: Duration::from_millis(DEFAULT_RESTART_DELAY_MS),
            max_restarts: 0,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| stdenv::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("WEBAPP_HOST_PORT").filter(|v| !v.trim().is_empty()) {
            Some(host_port) => host_port.trim().to_string(),
            None => {
                let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
                let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
                format!("{}:{}", host, port)
            }
        };

        Self {
            bind_addr,
            max_upload_bytes: parse_opt(&lookup, "MAX_UPLOAD_BYTES"),
            cors_origins_file: lookup("CORS_ORIGINS_FILE").unwrap_or(defaults.cors_origins_file),
            restart_delay: Duration::from_millis(parse_or(
                &lookup,
                "RESTART_DELAY_MS",
                DEFAULT_RESTART_DELAY_MS,
            )),
            max_restarts: parse_or(&lookup, "MAX_RESTARTS", defaults.max_restarts),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("invalid {}='{}', falling back to {}", key, raw, default);
            default
        }),
    }
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("invalid {}='{}', ignoring it", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.max_upload_bytes, None);
    }

    #[test]
    fn host_port_wins_over_host_and_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("WEBAPP_HOST_PORT", "127.0.0.1:9000"),
            ("HOST", "10.0.0.1"),
            ("PORT", "1234"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn host_and_port_are_combined() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("HOST", "127.0.0.1"), ("PORT", "8181")]));
        assert_eq!(config.bind_addr, "127.0.0.1:8181");
    }

    #[test]
    fn upload_cap_is_only_set_when_configured() {
        let config = ServerConfig::from_lookup(lookup_from(&[("MAX_UPLOAD_BYTES", "1048576")]));
        assert_eq!(config.max_upload_bytes, Some(1048576));
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "eighty"),
            ("MAX_UPLOAD_BYTES", "-1"),
            ("RESTART_DELAY_MS", "250"),
            ("MAX_RESTARTS", "3"),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.max_upload_bytes, None);
        assert_eq!(config.restart_delay, Duration::from_millis(250));
        assert_eq!(config.max_restarts, 3);
    }
}
