use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_DEBATE_BASE_URL;

/// Transport configuration for debate stream requests.
#[derive(Debug, Clone)]
pub struct DebateApiConfig {
    /// Base URL of the debate service.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional bound on connection establishment. The response stream itself
    /// is never timed out.
    pub connect_timeout: Option<Duration>,
}

impl Default for DebateApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEBATE_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            connect_timeout: None,
        }
    }
}

impl DebateApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}
