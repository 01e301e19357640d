pub mod config;
pub mod credential_api;
pub mod navigation;
pub mod wallet_bridge;

pub use config::{RuntimeProfile, SessionAdapterConfig};
pub use credential_api::CredentialApiAdapter;
pub use navigation::NavigationRecorder;
pub use wallet_bridge::{derive_import_address, WalletBridgeAdapter};
