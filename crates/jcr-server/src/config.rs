use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use jcr_ai::AiConfig;
use jcr_diff::DecodeOptions;
use jcr_report::RenderConfig;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
    pub allow_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_body_bytes: 16 * 1024 * 1024,
            allow_cors: true,
        }
    }
}

/// Settings for the whole application, usually read from `jcr.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub render: RenderConfig,
    pub decode: DecodeOptions,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.render.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jcr_report::RenderMode;

    #[test]
    fn default_config() {
        let c = AppConfig::default();
        assert_eq!(c.server.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.server.max_body_bytes, 16 * 1024 * 1024);
        assert!(c.server.allow_cors);
        assert_eq!(c.render.max_len(), 140);
        assert!(!c.decode.strict);
        assert!(!c.ai.enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = AppConfig::from_toml_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [render]
            mode = "compact"
            rows_per_page = 25

            [decode]
            strict = true
            "#,
        )
        .unwrap();
        assert_eq!(c.server.bind_addr.port(), 9000);
        assert_eq!(c.render.mode, RenderMode::Compact);
        assert_eq!(c.render.rows_per_page, 25);
        assert_eq!(c.render.max_len(), 60);
        assert!(c.decode.strict);
        assert_eq!(c.ai, AiConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[server\n"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn invalid_render_settings_rejected() {
        assert!(AppConfig::from_toml_str("[render]\nrows_per_page = 0\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jcr.toml");
        std::fs::write(&path, "[ai]\nenabled = true\ntimeout_secs = 5\n").unwrap();
        let c = AppConfig::load(&path).unwrap();
        assert!(c.ai.enabled);
        assert_eq!(c.ai.timeout_secs, 5);
    }
}
