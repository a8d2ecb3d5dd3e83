// Client configuration and base URL handling

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Write as _;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "FLAPJACK_API_URL";
pub const TIMEOUT_ENV: &str = "FLAPJACK_API_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:3081";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for a [`DinerClient`](crate::DinerClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Flapjack API location, e.g. "http://flapjack.example.com:3081".
    /// The scheme may be omitted and defaults to http.
    pub base_url: String,

    /// Per-request timeout in seconds, must be at least 1
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ignore HTTP(S)_PROXY settings from the environment
    #[serde(default)]
    pub no_proxy: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            no_proxy: false,
        }
    }

    /// Read `FLAPJACK_API_URL` and `FLAPJACK_API_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(value) = env::var(TIMEOUT_ENV) {
            config.timeout_secs = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidTimeout { value, source })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the per-request timeout; a fractional second rounds up
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let whole = timeout.as_secs();
        self.timeout_secs = if timeout.subsec_nanos() > 0 {
            whole.saturating_add(1)
        } else {
            whole
        };
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Protocol, host and port every request URI is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    protocol: String,
    host: String,
    port: u16,
    path_prefix: String,
}

impl BaseUrl {
    /// Parse a configured base URL
    ///
    /// The protocol defaults to http; the port defaults to 443 for https and 80 otherwise.
    /// Any path on the base URL is kept as a prefix for endpoint paths.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let invalid = |source| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        };

        // "example.com:5000" parses as scheme "example.com" with no host
        let url = match url::Url::parse(trimmed) {
            Ok(url) if url.has_host() => url,
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                url::Url::parse(&format!("http://{}", trimmed)).map_err(invalid)?
            }
            Err(source) => return Err(invalid(source)),
        };

        let protocol = url.scheme().to_ascii_lowercase();
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::UnsupportedProtocol(protocol));
        }

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ConfigError::MissingHost(raw.to_string()))?
            .to_string();
        let port = url.port().unwrap_or_else(|| default_port(&protocol));
        let path_prefix = url.path().trim_end_matches('/').to_string();

        Ok(Self {
            protocol,
            host,
            port,
            path_prefix,
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Full request URI for an endpoint path
    ///
    /// # Arguments
    /// * `path` - Endpoint path starting with '/', already escaped
    /// * `query` - Escaped query string without the leading '?'
    pub fn request_uri(&self, path: &str, query: Option<&str>) -> String {
        let mut uri = format!("{}://{}", self.protocol, self.host);
        if self.port != default_port(&self.protocol) {
            let _ = write!(uri, ":{}", self.port);
        }
        uri.push_str(&self.path_prefix);
        uri.push_str(path);
        if let Some(query) = query {
            uri.push('?');
            uri.push_str(query);
        }
        uri
    }
}

fn default_port(protocol: &str) -> u16 {
    if protocol == "https" {
        443
    } else {
        80
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_port() {
        let base = BaseUrl::parse("http://example.com:5000").unwrap();
        assert_eq!(base.protocol(), "http");
        assert_eq!(base.host(), "example.com");
        assert_eq!(base.port(), 5000);
        assert_eq!(
            base.request_uri("/checks/host-1", None),
            "http://example.com:5000/checks/host-1"
        );
    }

    #[test]
    fn test_protocol_defaults_to_http() {
        let base = BaseUrl::parse("example.com:5000").unwrap();
        assert_eq!(base.protocol(), "http");
        assert_eq!(base.port(), 5000);
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(BaseUrl::parse("http://example.com").unwrap().port(), 80);
        assert_eq!(BaseUrl::parse("https://example.com").unwrap().port(), 443);
        assert_eq!(BaseUrl::parse("example.com").unwrap().port(), 80);
    }

    #[test]
    fn test_default_port_is_not_written() {
        let base = BaseUrl::parse("https://flapjack.example.com/").unwrap();
        assert_eq!(
            base.request_uri("/entities", None),
            "https://flapjack.example.com/entities"
        );
    }

    #[test]
    fn test_non_default_port_for_https() {
        let base = BaseUrl::parse("https://flapjack.example.com:80").unwrap();
        assert_eq!(
            base.request_uri("/entities", None),
            "https://flapjack.example.com:80/entities"
        );
    }

    #[test]
    fn test_path_prefix_is_kept() {
        let base = BaseUrl::parse("http://example.com/flapjack/api/").unwrap();
        assert_eq!(
            base.request_uri("/outages/host-1", Some("start_time=x")),
            "http://example.com/flapjack/api/outages/host-1?start_time=x"
        );
    }

    #[test]
    fn test_single_slash_after_protocol() {
        let base = BaseUrl::parse("https:/example.com").unwrap();
        assert_eq!(base.protocol(), "https");
        assert_eq!(base.host(), "example.com");
        assert_eq!(base.port(), 443);
    }

    #[test]
    fn test_ip_without_protocol() {
        let base = BaseUrl::parse("127.0.0.1:5000").unwrap();
        assert_eq!(base.protocol(), "http");
        assert_eq!(base.host(), "127.0.0.1");
        assert_eq!(base.port(), 5000);
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config = ClientConfig::new("http://localhost").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_secs(1));

        let config = ClientConfig::new("http://localhost").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ClientConfig::new("http://localhost").with_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_uppercase_protocol() {
        let base = BaseUrl::parse("HTTPS://Example.COM").unwrap();
        assert_eq!(base.protocol(), "https");
        assert_eq!(base.host(), "example.com");
    }

    #[test]
    fn test_invalid_base_urls() {
        assert!(matches!(BaseUrl::parse("  "), Err(ConfigError::EmptyBaseUrl)));
        assert!(matches!(
            BaseUrl::parse("ftp://example.com"),
            Err(ConfigError::UnsupportedProtocol(p)) if p == "ftp"
        ));
        assert!(matches!(
            BaseUrl::parse("http://exa mple.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:3081"}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.no_proxy);
    }
}
