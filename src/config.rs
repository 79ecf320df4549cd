//! Server configuration

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the agent server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Name advertised in the Agent Card and liveness probe
    pub agent_name: String,

    /// Organization advertised in the Agent Card
    pub agent_organization: String,

    /// Externally reachable base URL; defaults to `http://localhost:<port>`
    pub public_url: Option<Url>,

    /// Key for the Google Speech-to-Text and Gemini APIs
    pub google_api_key: Option<String>,

    /// BCP-47 language of the audio
    pub language_code: String,

    /// Gemini model used for summaries
    pub gemini_model: String,

    /// Timeout for each backend HTTP request
    pub backend_timeout: Duration,
}

impl ServerConfig {
    pub const DEFAULT_AGENT_NAME: &'static str = "Audio Intelligence Agent";

    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            agent_name: Self::DEFAULT_AGENT_NAME.to_string(),
            agent_organization: "Your Org".to_string(),
            public_url: None,
            google_api_key: None,
            language_code: "en-US".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            backend_timeout: Duration::from_secs(120),
        }
    }

    /// Load the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup
    ///
    /// Unset and blank values fall back to the defaults of [`ServerConfig::new`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(name) = get("AGENT_NAME") {
            config.agent_name = name;
        }
        if let Some(org) = get("AGENT_ORGANIZATION") {
            config.agent_organization = org;
        }
        if let Some(url) = get("AGENT_PUBLIC_URL") {
            config.public_url = Some(parse("AGENT_PUBLIC_URL", &url)?);
        }
        config.google_api_key = get("GOOGLE_API_KEY");
        if let Some(lang) = get("SPEECH_LANGUAGE_CODE") {
            config.language_code = lang;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(secs) = get("BACKEND_TIMEOUT_SECS") {
            config.backend_timeout = Duration::from_secs(parse("BACKEND_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Set the bind address
    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the advertised agent identity
    pub fn with_agent(mut self, name: impl Into<String>, organization: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self.agent_organization = organization.into();
        self
    }

    /// Set the externally reachable base URL
    pub fn with_public_url(mut self, url: Url) -> Self {
        self.public_url = Some(url);
        self
    }

    /// Set the Google API key
    pub fn with_google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    /// Set the backend timeout
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised to other agents, without a trailing slash
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.as_str().trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    /// The Google API key, which the shipped backends cannot run without
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.google_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("GOOGLE_API_KEY"))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.agent_name, "Audio Intelligence Agent");
        assert_eq!(config.public_url(), "http://localhost:8080");
        assert_eq!(config.language_code, "en-US");
        assert_eq!(config.backend_timeout, Duration::from_secs(120));
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::Missing("GOOGLE_API_KEY"))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("AGENT_NAME", "Recorder"),
            ("AGENT_ORGANIZATION", "Acme"),
            ("AGENT_PUBLIC_URL", "https://agent.example.com/"),
            ("GOOGLE_API_KEY", "k"),
            ("BACKEND_TIMEOUT_SECS", "5"),
            ("GEMINI_MODEL", "  "),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.agent_name, "Recorder");
        assert_eq!(config.agent_organization, "Acme");
        assert_eq!(config.public_url(), "https://agent.example.com");
        assert_eq!(config.require_api_key().unwrap(), "k");
        assert_eq!(config.backend_timeout, Duration::from_secs(5));
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err =
            ServerConfig::from_lookup(lookup(&[("AGENT_PUBLIC_URL", "not a url")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "AGENT_PUBLIC_URL",
                ..
            }
        ));
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::new()
            .with_bind("127.0.0.1", 3000)
            .with_agent("A", "B")
            .with_google_api_key("key")
            .with_backend_timeout(Duration::from_secs(1));

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.agent_organization, "B");
        assert_eq!(config.public_url(), "http://localhost:3000");
    }
}
