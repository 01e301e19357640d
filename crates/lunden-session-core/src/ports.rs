use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Account, NavigationTarget, PendingCount, SecretString};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("policy violation: {0}")]
    Policy(String),
    /// The service refused the request. The message is whatever the
    /// service attached, which may be nothing at all; call sites supply
    /// their own fallback wording for that case.
    #[error("service rejected request")]
    Rejected(Option<String>),
}

/// Contract expected from the privileged background wallet service.
#[async_trait]
pub trait WalletServicePort: Send + Sync {
    async fn is_booted(&self) -> Result<bool, PortError>;
    async fn is_unlocked(&self) -> Result<bool, PortError>;
    async fn boot(&self, password: &str) -> Result<(), PortError>;
    async fn import_private_key(&self, secret: &SecretString) -> Result<Vec<Account>, PortError>;
    async fn current_account(&self) -> Result<Account, PortError>;
    async fn change_account(&self, address: &str, keyring_type: &str) -> Result<(), PortError>;
    async fn pending_count(&self, address: &str) -> Result<PendingCount, PortError>;
}

/// Contract expected from the remote account-lookup endpoint.
#[async_trait]
pub trait CredentialLookupPort: Send + Sync {
    async fn exchange(
        &self,
        account: &str,
        password: &str,
    ) -> Result<crate::domain::ExchangeResponse, PortError>;
}

/// Contract expected from the navigation boundary.
pub trait NavigationPort: Send + Sync {
    fn replace(&self, target: NavigationTarget) -> Result<(), PortError>;
}
