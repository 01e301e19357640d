use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct SessionAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub credential_api_url: Option<String>,
    pub credential_api_token: Option<String>,
    pub wallet_bridge_url: Option<String>,
    pub request_timeout_ms: u64,
    pub pending_poll_interval_ms: u64,
}

impl Default for SessionAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            credential_api_url: None,
            credential_api_token: None,
            wallet_bridge_url: None,
            request_timeout_ms: 15_000,
            pending_poll_interval_ms: 30_000,
        }
    }
}

impl SessionAdapterConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            runtime_profile: match std::env::var("LUNDEN_RUNTIME_PROFILE").as_deref() {
                Ok("production") => RuntimeProfile::Production,
                _ => RuntimeProfile::Development,
            },
            credential_api_url: env_string("LUNDEN_CREDENTIAL_API_URL"),
            credential_api_token: env_string("LUNDEN_CREDENTIAL_API_TOKEN"),
            wallet_bridge_url: env_string("LUNDEN_WALLET_BRIDGE_URL"),
            request_timeout_ms: env_u64("LUNDEN_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            pending_poll_interval_ms: env_u64("LUNDEN_POLL_INTERVAL_MS")
                .unwrap_or(defaults.pending_poll_interval_ms),
        }
    }

    /// Production refuses to run on the deterministic fallbacks.
    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.pending_poll_interval_ms)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
