//! Headless driver for the Lunden session layer.
//!
//! Wires the configured runtimes (or the deterministic development
//! fallbacks) into the coordination core, then runs one provisioning
//! pass: entry precondition, credential bootstrap, account refresh, and
//! a short pending-activity polling window.

use std::sync::Arc;
use std::time::Duration;

use lunden_session_adapters::{
    CredentialApiAdapter, NavigationRecorder, SessionAdapterConfig, WalletBridgeAdapter,
};
use lunden_session_core::{
    AccountSession, CredentialBootstrap, FormField, NavigationTarget, PendingActivityPoller,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Lunden session driver");

    let config = SessionAdapterConfig::from_env();
    let bridge = Arc::new(WalletBridgeAdapter::with_config(config.clone()));
    let lookup = CredentialApiAdapter::with_config(config.clone());
    let navigation = Arc::new(NavigationRecorder::default());

    let bootstrap = CredentialBootstrap::new(
        lookup,
        Arc::clone(&bridge),
        Arc::clone(&navigation),
        config.request_timeout(),
        0,
    );

    if bootstrap.redirect_if_locked().await? {
        tracing::info!("wallet is booted but locked; unlock surface requested");
        return Ok(());
    }

    let account_id =
        std::env::var("LUNDEN_ACCOUNT").unwrap_or_else(|_| "dev@lunden.local".to_owned());
    let password =
        std::env::var("LUNDEN_PASSWORD").unwrap_or_else(|_| "development-password".to_owned());
    bootstrap.submit(&account_id, &password).await;

    for field in [FormField::Account, FormField::Password, FormField::Key] {
        for message in bootstrap.form().field_errors(field) {
            tracing::warn!(?field, %message, "submission error");
        }
    }

    match navigation.last() {
        Some(NavigationTarget::ImportSuccess(state)) => {
            tracing::info!(accounts = state.accounts.len(), "account import succeeded");
        }
        Some(target) => {
            tracing::info!(?target, "navigation requested");
            return Ok(());
        }
        None => {
            tracing::warn!("bootstrap did not complete; see submission errors above");
            return Ok(());
        }
    }

    let session = AccountSession::new(Arc::clone(&bridge));
    let account = session.refresh().await?;
    tracing::info!(address = %account.address, kind = ?account.kind(), "active account");

    let poller = PendingActivityPoller::with_period(Arc::clone(&bridge), config.poll_period());
    poller.watch_account(Some(&account));
    tokio::time::sleep(Duration::from_millis(250)).await;
    tracing::info!(pending = poller.pending_count(), "pending transactions");
    poller.watch_account(None);

    Ok(())
}
