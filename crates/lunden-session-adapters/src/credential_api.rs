use async_trait::async_trait;

use lunden_session_core::{CredentialLookupPort, ExchangeResponse, PortError, SecretString};

use crate::SessionAdapterConfig;

/// Key handed out by the deterministic development fallback.
const DEV_FALLBACK_KEY: &str =
    "0x4242424242424242424242424242424242424242424242424242424242424242";

/// Remote account-lookup client.
///
/// Credentials travel only inside the request body over an authenticated
/// POST; they never appear in the URL, the query string, or any log
/// record. The adapter owns the whole request shape so no caller can
/// smuggle them back into a URL.
#[derive(Debug, Clone)]
pub struct CredentialApiAdapter {
    mode: LookupMode,
}

#[derive(Debug, Clone)]
enum LookupMode {
    Http {
        client: reqwest::Client,
        base_url: String,
        token: Option<String>,
    },
    Deterministic,
    Disabled(String),
}

impl Default for CredentialApiAdapter {
    fn default() -> Self {
        Self::with_config(SessionAdapterConfig::from_env())
    }
}

impl CredentialApiAdapter {
    pub fn with_config(config: SessionAdapterConfig) -> Self {
        let mode = if let Some(base_url) = config.credential_api_url.clone() {
            match reqwest::Client::builder()
                .timeout(config.request_timeout())
                .build()
            {
                Ok(client) => LookupMode::Http {
                    client,
                    base_url,
                    token: config.credential_api_token.clone(),
                },
                Err(e) => {
                    if config.strict_runtime_required() {
                        LookupMode::Disabled(format!(
                            "failed to initialize credential API client in production profile: {e}"
                        ))
                    } else {
                        LookupMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            LookupMode::Disabled(
                "credential API URL not configured in production runtime profile".to_owned(),
            )
        } else {
            LookupMode::Deterministic
        };

        Self { mode }
    }
}

#[async_trait]
impl CredentialLookupPort for CredentialApiAdapter {
    async fn exchange(
        &self,
        account: &str,
        password: &str,
    ) -> Result<ExchangeResponse, PortError> {
        match &self.mode {
            LookupMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            LookupMode::Deterministic => {
                if account.is_empty() || password.is_empty() {
                    return Ok(ExchangeResponse {
                        success: 0,
                        p_key: None,
                    });
                }
                Ok(ExchangeResponse {
                    success: 1,
                    p_key: Some(SecretString::new(DEV_FALLBACK_KEY)),
                })
            }
            LookupMode::Http {
                client,
                base_url,
                token,
            } => {
                // Only the account identifier is loggable; the password and
                // the returned key never reach a log record.
                tracing::debug!(account, "credential exchange requested");
                let body = serde_json::json!({
                    "email": account,
                    "password": password,
                });
                let mut request = client.post(format!("{base_url}/api/address")).json(&body);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }

                let response = request.send().await.map_err(|e| {
                    PortError::Transport(format!("credential lookup request failed: {e}"))
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(PortError::Transport(format!(
                        "credential lookup status {status}"
                    )));
                }
                response.json::<ExchangeResponse>().await.map_err(|e| {
                    PortError::Transport(format!("credential lookup decode failed: {e}"))
                })
            }
        }
    }
}
