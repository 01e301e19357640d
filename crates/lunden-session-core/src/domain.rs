use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Keyring identifiers whose signing key lives on an external device.
pub const HARDWARE_KEYRING_TYPES: &[&str] =
    &["Ledger Hardware", "Trezor Hardware", "Onekey Hardware"];

/// Keyring identifier for addresses tracked without signing capability.
pub const WATCH_KEYRING_TYPE: &str = "Watch Address";

/// Keyring identifier for accounts created from an imported private key.
pub const SIMPLE_KEYRING_TYPE: &str = "Simple Key Pair";

/// Keyring identifier for seed-phrase derived accounts.
pub const HD_KEYRING_TYPE: &str = "HD Key Tree";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    SoftwareKey,
    HardwareDevice,
    WatchOnly,
}

/// One wallet account as reported by the background service.
///
/// The address is canonicalized to lowercase hex on construction; the
/// keyring identifier is carried verbatim and serialized under `type`,
/// which is the field name the background service speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(rename = "type")]
    pub keyring_type: String,
}

impl Account {
    pub fn new(address: impl Into<String>, keyring_type: impl Into<String>) -> Self {
        Self {
            address: address.into().to_ascii_lowercase(),
            keyring_type: keyring_type.into(),
        }
    }

    /// Classify the account: membership in the hardware keyring set,
    /// equality with the watch keyring identifier, software otherwise.
    pub fn kind(&self) -> AccountKind {
        if self.keyring_type == WATCH_KEYRING_TYPE {
            AccountKind::WatchOnly
        } else if HARDWARE_KEYRING_TYPES.contains(&self.keyring_type.as_str()) {
            AccountKind::HardwareDevice
        } else {
            AccountKind::SoftwareKey
        }
    }
}

/// An account annotated with its 1-based position for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedAccount {
    #[serde(flatten)]
    pub account: Account,
    pub index: usize,
}

/// Annotate a freshly imported account list with 1-based display indices.
pub fn index_accounts(accounts: &[Account]) -> Vec<IndexedAccount> {
    accounts
        .iter()
        .enumerate()
        .map(|(i, account)| IndexedAccount {
            account: account.clone(),
            index: i + 1,
        })
        .collect()
}

/// Constructor data handed to the import-success surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSuccessState {
    pub accounts: Vec<IndexedAccount>,
    pub title: String,
    pub editing: bool,
    pub imported_account: bool,
    pub imported_length: usize,
}

/// Destination handed to the navigation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationTarget {
    Unlock,
    Bootstrap,
    ImportSuccess(ImportSuccessState),
}

/// Wire shape of the pending-transaction counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCount {
    pub total_count: u64,
}

/// Wire shape of the remote credential lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponse {
    #[serde(default)]
    pub success: u8,
    #[serde(default)]
    pub p_key: Option<SecretString>,
}

impl ExchangeResponse {
    pub fn granted(&self) -> bool {
        self.success == 1
    }
}

/// An opaque credential: a password or an exchanged private key.
///
/// Deliberately has no `Display`, no `Serialize`, and a redacted `Debug`
/// so the value cannot reach a log record or a persisted structure. The
/// backing string is zeroized on drop.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([redacted])")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
