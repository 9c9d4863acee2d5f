use crate::error::{CantiError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CantiConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Chat-completion provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// No timeout is applied to the completion call when unset.
    pub request_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json".
    pub format: String,
}

impl Default for CantiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
            },
            upstream: UpstreamConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com".into(),
                model: "gpt-3.5-turbo".into(),
                request_timeout_secs: None,
            },
            logging: LoggingConfig {
                level: "info".into(),
                format: "pretty".into(),
            },
        }
    }
}

impl CantiConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(key) = get("OPENAI_API_KEY") {
            cfg.upstream.api_key = key;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            cfg.upstream.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("CANTI_MODEL") {
            cfg.upstream.model = model;
        }
        if let Some(secs) = get("CANTI_REQUEST_TIMEOUT_SECS") {
            cfg.upstream.request_timeout_secs = Some(parse_var("CANTI_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(host) = get("CANTI_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = get("CANTI_PORT") {
            cfg.server.port = parse_var("CANTI_PORT", &port)?;
        }
        if let Some(level) = get("CANTI_LOG_LEVEL") {
            cfg.logging.level = level;
        }
        if let Some(format) = get("CANTI_LOG_FORMAT") {
            cfg.logging.format = format;
        }

        Ok(cfg)
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CantiError::Config(format!("{key} has invalid value {value:?}")))
}
