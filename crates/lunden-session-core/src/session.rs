use std::sync::{Arc, Mutex};

use crate::domain::Account;
use crate::ports::{PortError, WalletServicePort};

/// Mirror of the background service's currently active account.
///
/// The cached value is never mutated independently: it is only replaced
/// from `refresh()` or after the service acknowledges a switch, so every
/// consumer holding the same session observes the service's truth.
pub struct AccountSession<W> {
    wallet: Arc<W>,
    current: Mutex<Option<Account>>,
}

impl<W> AccountSession<W>
where
    W: WalletServicePort,
{
    pub fn new(wallet: Arc<W>) -> Self {
        Self {
            wallet,
            current: Mutex::new(None),
        }
    }

    /// Cached read of the active account.
    pub fn current(&self) -> Option<Account> {
        self.current.lock().ok().and_then(|g| g.clone())
    }

    /// Re-synchronize the cache from the service's source of truth.
    pub async fn refresh(&self) -> Result<Account, PortError> {
        let account = self.wallet.current_account().await?;
        self.store(Some(account.clone()))?;
        Ok(account)
    }

    /// Switch the active account. The cache updates only after the
    /// service acknowledges; there is no optimistic update, and a failed
    /// switch leaves the previous account in place.
    pub async fn switch_to(
        &self,
        address: &str,
        keyring_type: &str,
    ) -> Result<Account, PortError> {
        self.wallet.change_account(address, keyring_type).await?;
        let account = Account::new(address, keyring_type);
        self.store(Some(account.clone()))?;
        tracing::info!(address = %account.address, "active account switched");
        Ok(account)
    }

    /// Drop the cached account (consumer unmounted or no address left).
    pub fn clear(&self) {
        let _ = self.store(None);
    }

    fn store(&self, value: Option<Account>) -> Result<(), PortError> {
        let mut g = self
            .current
            .lock()
            .map_err(|e| PortError::Transport(format!("session lock poisoned: {e}")))?;
        *g = value;
        Ok(())
    }
}
