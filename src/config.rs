//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use debate_api::DebateApiConfig;

use crate::sink::RenderMode;

pub const API_URL_VAR: &str = "DEBATE_API_URL";
pub const CONNECT_TIMEOUT_VAR: &str = "DEBATE_CONNECT_TIMEOUT_SEC";
pub const MARKDOWN_VAR: &str = "DEBATE_MARKDOWN";
pub const EXPORT_DIR_VAR: &str = "DEBATE_EXPORT_DIR";

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_url: Option<String>,
    pub connect_timeout: Option<Duration>,
    pub markdown: bool,
    pub export_dir: Option<PathBuf>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env_string_opt(API_URL_VAR),
            connect_timeout: env_secs_opt(CONNECT_TIMEOUT_VAR),
            markdown: env_flag(MARKDOWN_VAR),
            export_dir: env_string_opt(EXPORT_DIR_VAR).map(PathBuf::from),
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::from_flag(self.markdown)
    }

    /// Transport settings, with `url_override` taking precedence over the
    /// environment.
    pub fn api_config(&self, url_override: Option<&str>) -> DebateApiConfig {
        let mut config = DebateApiConfig::default();
        if let Some(url) = url_override.or(self.api_url.as_deref()) {
            config = config.with_base_url(url);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }
        config.with_user_agent(concat!("debate_stream/", env!("CARGO_PKG_VERSION")))
    }

    /// Directory exports are written to; the current directory when unset.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value.trim().to_string())
        }
    })
}

fn env_secs_opt(key: &str) -> Option<Duration> {
    let value = env_string_opt(key)?;
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            tracing::warn!(key, %value, "ignoring invalid timeout; expected a positive number of seconds");
            None
        }
    }
}
