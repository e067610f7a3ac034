//! Configuration for the kith-api service.

use serde::Deserialize;

/// API server configuration.
///
/// Loaded from `kith.toml` `[api]` section or `KITH_API__` environment
/// variables; Neo4j settings live under `[neo4j]` / `KITH__NEO4J__`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bind address (default: "127.0.0.1").
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port (default: 8000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty means allow any (local dev).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:8000");
        assert!(config.allowed_origins.is_empty());
    }
}
