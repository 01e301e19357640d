pub mod bootstrap;
pub mod domain;
pub mod error;
pub mod links;
pub mod poller;
pub mod ports;
pub mod runner;
pub mod session;

pub use bootstrap::{CredentialBootstrap, FormField, FormState, MINIMUM_PASSWORD_LENGTH};
pub use domain::{
    index_accounts, Account, AccountKind, ExchangeResponse, ImportSuccessState, IndexedAccount,
    NavigationTarget, PendingCount, SecretString, HARDWARE_KEYRING_TYPES, SIMPLE_KEYRING_TYPE,
    WATCH_KEYRING_TYPE,
};
pub use error::SessionError;
pub use links::{action_url, explorer_url, DashboardAction};
pub use poller::{PendingActivityPoller, DEFAULT_POLL_PERIOD};
pub use ports::{CredentialLookupPort, NavigationPort, PortError, WalletServicePort};
pub use runner::{RequestError, RequestPhase, RequestRunner, RequestState};
pub use session::AccountSession;
