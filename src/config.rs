use std::{env, net::SocketAddr};

use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub levels_backend_url: Url,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LEVELS_BACKEND_URL is required and must not be empty")]
    MissingBackendUrl,
    #[error("LEVELS_BACKEND_URL must be a valid http(s) URL")]
    InvalidBackendUrl,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let levels_backend_url = lookup("LEVELS_BACKEND_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;
        let levels_backend_url = Url::parse(&levels_backend_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(ConfigError::InvalidBackendUrl)?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = lookup("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let config = Self {
            bind_addr,
            bind_port,
            levels_backend_url,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = parse(&[("LEVELS_BACKEND_URL", "http://localhost:3000/api/levels")])
            .expect("config should parse");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(
            config.levels_backend_url.as_str(),
            "http://localhost:3000/api/levels"
        );
    }

    #[test]
    fn missing_backend_url_fails() {
        let err = parse(&[]).expect_err("expected missing backend url error");
        assert!(matches!(err, ConfigError::MissingBackendUrl));

        let err = parse(&[("LEVELS_BACKEND_URL", "   ")]).expect_err("blank url must fail");
        assert!(matches!(err, ConfigError::MissingBackendUrl));
    }

    #[test]
    fn non_http_backend_url_fails() {
        let err = parse(&[("LEVELS_BACKEND_URL", "ftp://example.com/levels")])
            .expect_err("expected invalid backend url error");
        assert!(matches!(err, ConfigError::InvalidBackendUrl));

        let err = parse(&[("LEVELS_BACKEND_URL", "not a url")])
            .expect_err("expected invalid backend url error");
        assert!(matches!(err, ConfigError::InvalidBackendUrl));
    }

    #[test]
    fn invalid_port_fails() {
        let err = parse(&[
            ("LEVELS_BACKEND_URL", "https://example.com/levels"),
            ("BIND_PORT", "99999"),
        ])
        .expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn invalid_bind_addr_fails() {
        let err = parse(&[
            ("LEVELS_BACKEND_URL", "https://example.com/levels"),
            ("BIND_ADDR", "not-an-ip"),
        ])
        .expect_err("expected invalid socket error");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }
}
