use config::{Config, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use crate::{Error, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub broker: BrokerConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub allowed_origins: Vec<String>,
    pub enable_cors: bool,
    pub enable_tracing: bool,
    /// Prefix every bearer credential must carry.
    pub token_prefix: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrokerConfig {
    pub observability_url: String,
    pub itsm_url: String,
    /// Per-call budget for the remote tier, in milliseconds.
    pub timeout_ms: u64,
}

impl BrokerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    pub json_logs: bool,
    pub service_name: String,
}

impl AppConfig {
    /// Load the layered configuration and check it.
    pub fn load() -> Result<Self> {
        let env = std::env::var("SUPER_TOOLS_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__BROKER__TIMEOUT_MS=2000 to broker.timeout_ms
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()
            .map_err(|e| Error::config(e.to_string()))?;

        let config: Self = s
            .try_deserialize()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the broker and gateway cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.broker.timeout_ms == 0 {
            return Err(Error::config("broker.timeout_ms must be greater than zero"));
        }
        for (key, url) in [
            ("broker.observability_url", &self.broker.observability_url),
            ("broker.itsm_url", &self.broker.itsm_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config(format!("{} must be an http(s) URL, got '{}'", key, url)));
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 9200,
            },
            gateway: GatewayConfig {
                allowed_origins: vec!["*".into()],
                enable_cors: true,
                enable_tracing: true,
                token_prefix: Secret::new("test-token-".into()),
            },
            broker: BrokerConfig {
                observability_url: "http://observability-adapter:9010".into(),
                itsm_url: "http://itsm-adapter:9020".into(),
                timeout_ms: 5000,
            },
            telemetry: TelemetryConfig {
                json_logs: false,
                service_name: "super-tools".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_broker_timeout_is_five_seconds() {
        let config = AppConfig::default();
        assert_eq!(config.broker.timeout(), Duration::from_secs(5));
        assert_eq!(config.gateway.token_prefix.expose_secret(), "test-token-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.broker.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_non_http_adapter_url() {
        let mut config = AppConfig::default();
        config.broker.itsm_url = "itsm-adapter:9020".into();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("broker.itsm_url"));
    }
}
