//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Lectern HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `4000`).
    pub port: u16,
    /// Seconds between keep-alive ping frames on live streams.
    pub ping_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            ping_interval_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host() {
        assert_eq!(ServerConfig::default().host, "127.0.0.1");
    }

    #[test]
    fn default_port() {
        assert_eq!(ServerConfig::default().port, 4000);
    }

    #[test]
    fn default_ping_interval() {
        assert_eq!(ServerConfig::default().ping_interval_secs, 15);
    }

    #[test]
    fn partial_deserialize_fills_defaults() {
        let cfg: ServerConfig = serde_json::from_str(r#"{"port":8080}"#).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ServerConfig {
            host: "0.0.0.0".into(),
            port: 9999,
            ping_interval_secs: 5,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, cfg.host);
        assert_eq!(back.port, cfg.port);
        assert_eq!(back.ping_interval_secs, cfg.ping_interval_secs);
    }
}
