use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};

use lunden_session_core::{
    Account, PendingCount, PortError, SecretString, WalletServicePort, SIMPLE_KEYRING_TYPE,
};

use crate::SessionAdapterConfig;

/// Runtime adapter for the privileged background wallet service.
///
/// Two modes, mirroring how the provider adapter treats its runtimes: a
/// proxy speaking `{method, params}` envelopes to the real service, and a
/// deterministic in-memory wallet used for development and as the test
/// fixture. Production configuration without a bridge URL yields a
/// disabled adapter that answers policy errors.
#[derive(Debug, Clone)]
pub struct WalletBridgeAdapter {
    mode: BridgeMode,
}

#[derive(Debug, Clone)]
enum BridgeMode {
    Proxy {
        client: reqwest::Client,
        base_url: String,
    },
    InMemory(Arc<Mutex<BridgeState>>),
    Disabled(String),
}

#[derive(Debug, Default)]
struct BridgeState {
    booted: bool,
    unlocked: bool,
    password: Option<String>,
    accounts: Vec<Account>,
    current: Option<usize>,
    pending: HashMap<String, u64>,
    calls: Vec<String>,
    fail_boot: Option<Option<String>>,
    fail_import: Option<Option<String>>,
    fail_pending: bool,
}

impl Default for WalletBridgeAdapter {
    fn default() -> Self {
        Self::with_config(SessionAdapterConfig::from_env())
    }
}

impl WalletBridgeAdapter {
    pub fn with_config(config: SessionAdapterConfig) -> Self {
        let mode = if let Some(base_url) = config.wallet_bridge_url.clone() {
            match reqwest::Client::builder()
                .timeout(config.request_timeout())
                .build()
            {
                Ok(client) => BridgeMode::Proxy { client, base_url },
                Err(e) => {
                    if config.strict_runtime_required() {
                        BridgeMode::Disabled(format!(
                            "failed to initialize wallet bridge client in production profile: {e}"
                        ))
                    } else {
                        BridgeMode::InMemory(Arc::default())
                    }
                }
            }
        } else if config.strict_runtime_required() {
            BridgeMode::Disabled(
                "wallet bridge URL not configured in production runtime profile".to_owned(),
            )
        } else {
            BridgeMode::InMemory(Arc::default())
        };

        Self { mode }
    }

    pub fn in_memory() -> Self {
        Self {
            mode: BridgeMode::InMemory(Arc::default()),
        }
    }

    /// Seed an account into the in-memory wallet, making it current.
    pub fn seed_account(&self, account: Account) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.accounts.push(account);
        g.current = Some(g.accounts.len() - 1);
        g.booted = true;
        g.unlocked = true;
        Ok(())
    }

    pub fn set_locked(&self) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.booted = true;
        g.unlocked = false;
        Ok(())
    }

    pub fn set_pending_count(&self, address: &str, total: u64) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.pending.insert(address.to_ascii_lowercase(), total);
        Ok(())
    }

    /// Make the next boot call fail with the given service message.
    pub fn reject_next_boot(&self, message: Option<&str>) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.fail_boot = Some(message.map(str::to_owned));
        Ok(())
    }

    /// Make the next import call fail with the given service message.
    pub fn reject_next_import(&self, message: Option<&str>) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.fail_import = Some(message.map(str::to_owned));
        Ok(())
    }

    /// Fail every pending-count query until re-enabled.
    pub fn set_pending_feed_down(&self, down: bool) -> Result<(), PortError> {
        let mut g = self.in_memory_state()?;
        g.fail_pending = down;
        Ok(())
    }

    /// Ordered names of the port methods invoked on the in-memory wallet.
    pub fn call_log(&self) -> Result<Vec<String>, PortError> {
        Ok(self.in_memory_state()?.calls.clone())
    }

    pub fn accounts(&self) -> Result<Vec<Account>, PortError> {
        Ok(self.in_memory_state()?.accounts.clone())
    }

    fn in_memory_state(&self) -> Result<std::sync::MutexGuard<'_, BridgeState>, PortError> {
        match &self.mode {
            BridgeMode::InMemory(state) => state
                .lock()
                .map_err(|e| PortError::Transport(format!("bridge lock poisoned: {e}"))),
            BridgeMode::Proxy { .. } => Err(PortError::NotImplemented(
                "in-memory hooks are unavailable on the proxy runtime",
            )),
            BridgeMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
        }
    }

    async fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let (client, base_url) = match &self.mode {
            BridgeMode::Proxy { client, base_url } => (client, base_url),
            BridgeMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            BridgeMode::InMemory(_) => {
                return Err(PortError::NotImplemented("wallet bridge proxy not enabled"))
            }
        };

        tracing::debug!(method, "wallet bridge call");
        let payload = serde_json::json!({
            "method": method,
            "params": params,
        });
        let response = client
            .post(base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("wallet bridge json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "wallet bridge status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_owned);
            return Err(PortError::Rejected(message));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("wallet bridge missing result".to_owned()))
    }

    fn record(g: &mut BridgeState, method: &str) {
        g.calls.push(method.to_owned());
    }
}

#[async_trait]
impl WalletServicePort for WalletBridgeAdapter {
    async fn is_booted(&self) -> Result<bool, PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "is_booted");
            return Ok(g.booted);
        }
        let result = self.proxy_call("isBooted", serde_json::json!([])).await?;
        result
            .as_bool()
            .ok_or_else(|| PortError::Transport("isBooted: bool expected".to_owned()))
    }

    async fn is_unlocked(&self) -> Result<bool, PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "is_unlocked");
            return Ok(g.unlocked);
        }
        let result = self.proxy_call("isUnlocked", serde_json::json!([])).await?;
        result
            .as_bool()
            .ok_or_else(|| PortError::Transport("isUnlocked: bool expected".to_owned()))
    }

    async fn boot(&self, password: &str) -> Result<(), PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "boot");
            if let Some(message) = g.fail_boot.take() {
                return Err(PortError::Rejected(message));
            }
            if password.is_empty() {
                return Err(PortError::Validation("password must not be empty".to_owned()));
            }
            // A re-boot with the stored password is accepted so a retry
            // after a failed import converges instead of dead-ending.
            if g.booted && g.password.as_deref() != Some(password) {
                return Err(PortError::Rejected(Some("incorrect password".to_owned())));
            }
            g.booted = true;
            g.unlocked = true;
            g.password = Some(password.to_owned());
            return Ok(());
        }
        self.proxy_call("boot", serde_json::json!([password])).await?;
        Ok(())
    }

    async fn import_private_key(&self, secret: &SecretString) -> Result<Vec<Account>, PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "import_private_key");
            if let Some(message) = g.fail_import.take() {
                return Err(PortError::Rejected(message));
            }
            if !g.booted {
                return Err(PortError::Policy("wallet service is not booted".to_owned()));
            }
            let raw = secret.expose();
            let hex = raw.strip_prefix("0x").unwrap_or(raw);
            if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(PortError::Rejected(None));
            }

            let account = Account::new(derive_import_address(raw), SIMPLE_KEYRING_TYPE);
            let index = match g.accounts.iter().position(|a| a.address == account.address) {
                Some(i) => i,
                None => {
                    g.accounts.push(account.clone());
                    g.accounts.len() - 1
                }
            };
            g.current = Some(index);
            return Ok(vec![account]);
        }
        let result = self
            .proxy_call("importPrivateKey", serde_json::json!([secret.expose()]))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| PortError::Transport(format!("importPrivateKey decode failed: {e}")))
    }

    async fn current_account(&self) -> Result<Account, PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "current_account");
            return g
                .current
                .and_then(|i| g.accounts.get(i).cloned())
                .ok_or_else(|| PortError::NotFound("no current account".to_owned()));
        }
        let result = self
            .proxy_call("getCurrentAccount", serde_json::json!([]))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| PortError::Transport(format!("getCurrentAccount decode failed: {e}")))
    }

    async fn change_account(&self, address: &str, keyring_type: &str) -> Result<(), PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "change_account");
            let wanted = address.to_ascii_lowercase();
            let index = g
                .accounts
                .iter()
                .position(|a| a.address == wanted && a.keyring_type == keyring_type)
                .ok_or_else(|| PortError::NotFound(format!("unknown account: {wanted}")))?;
            g.current = Some(index);
            return Ok(());
        }
        self.proxy_call(
            "changeAccount",
            serde_json::json!([{ "address": address, "type": keyring_type }]),
        )
        .await?;
        Ok(())
    }

    async fn pending_count(&self, address: &str) -> Result<PendingCount, PortError> {
        if let BridgeMode::InMemory(_) = self.mode {
            let mut g = self.in_memory_state()?;
            Self::record(&mut g, "pending_count");
            if g.fail_pending {
                return Err(PortError::Transport("pending feed unavailable".to_owned()));
            }
            let total_count = g
                .pending
                .get(&address.to_ascii_lowercase())
                .copied()
                .unwrap_or(0);
            return Ok(PendingCount { total_count });
        }
        let result = self
            .proxy_call("getPendingCount", serde_json::json!([address]))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| PortError::Transport(format!("getPendingCount decode failed: {e}")))
    }
}

/// Address the in-memory wallet assigns to an imported key: the first 20
/// bytes of the key material's SHA-256, lowercase hex.
pub fn derive_import_address(secret: &str) -> String {
    let hex = secret.strip_prefix("0x").unwrap_or(secret);
    let digest = Sha256::digest(hex.as_bytes());
    let mut address = String::with_capacity(42);
    address.push_str("0x");
    for byte in digest.iter().take(20) {
        address.push_str(&format!("{byte:02x}"));
    }
    address
}
