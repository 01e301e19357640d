mod common;

use lunden_session_adapters::derive_import_address;
use lunden_session_core::{FormField, NavigationTarget, PortError, WalletServicePort};

use common::{bootstrap_fixture, ACCOUNT_ID, KEY_A, KEY_B, PASSWORD};

#[tokio::test]
async fn denied_exchange_stops_before_any_wallet_call() {
    let fx = bootstrap_fixture();
    fx.lookup.push_denied();

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let errors = fx.bootstrap.form().field_errors(FormField::Password);
    assert_eq!(errors, vec!["Invalid account or password".to_owned()]);
    assert!(fx.bridge.call_log().expect("call log").is_empty());
    assert!(fx.navigation.last().is_none());
}

#[tokio::test]
async fn successful_bootstrap_boots_then_imports() {
    let fx = bootstrap_fixture();
    fx.lookup.push_granted(KEY_A);

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let calls = fx.bridge.call_log().expect("call log");
    assert_eq!(calls, vec!["boot".to_owned(), "import_private_key".to_owned()]);

    let target = fx.navigation.last().expect("navigation fired");
    let NavigationTarget::ImportSuccess(state) = target else {
        panic!("expected import success navigation, got {target:?}");
    };
    assert_eq!(state.title, "Successfully created");
    assert!(state.editing);
    assert!(state.imported_account);
    assert_eq!(state.imported_length, 0);
    assert_eq!(state.accounts.len(), 1);
    assert_eq!(state.accounts[0].index, 1);
    assert_eq!(state.accounts[0].account.address, derive_import_address(KEY_A));

    assert!(fx.bootstrap.form().is_clean());
}

#[tokio::test]
async fn trimmed_password_reaches_the_boot_call() {
    let fx = bootstrap_fixture();
    fx.lookup.push_granted(KEY_A);

    fx.bootstrap.submit(ACCOUNT_ID, "  spaced-out-pass  ").await;

    // The in-memory wallet stores the boot password; a re-boot with the
    // trimmed form must be accepted, proving the trim happened.
    fx.lookup.push_granted(KEY_A);
    fx.bootstrap.submit(ACCOUNT_ID, "spaced-out-pass").await;
    assert!(fx.bootstrap.form().is_clean());
}

#[tokio::test]
async fn boot_failure_without_message_shows_fallback() {
    let fx = bootstrap_fixture();
    fx.lookup.push_granted(KEY_A);
    fx.bridge.reject_next_boot(None).expect("inject boot failure");

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let errors = fx.bootstrap.form().field_errors(FormField::Password);
    assert_eq!(errors, vec!["incorrect password".to_owned()]);
    // The sequence stopped at boot; the key was never offered.
    let calls = fx.bridge.call_log().expect("call log");
    assert_eq!(calls, vec!["boot".to_owned()]);
    assert!(fx.navigation.last().is_none());
}

#[tokio::test]
async fn boot_failure_with_message_shows_the_service_wording() {
    let fx = bootstrap_fixture();
    fx.lookup.push_granted(KEY_A);
    fx.bridge
        .reject_next_boot(Some("vault migration in progress"))
        .expect("inject boot failure");

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let errors = fx.bootstrap.form().field_errors(FormField::Password);
    assert_eq!(errors, vec!["vault migration in progress".to_owned()]);
}

#[tokio::test]
async fn import_failure_surfaces_on_the_key_field() {
    let fx = bootstrap_fixture();
    fx.lookup.push_granted(KEY_A);
    fx.bridge
        .reject_next_import(None)
        .expect("inject import failure");

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    assert!(fx
        .bootstrap
        .form()
        .field_errors(FormField::Password)
        .is_empty());
    let errors = fx.bootstrap.form().field_errors(FormField::Key);
    assert_eq!(errors, vec!["Not a valid private key".to_owned()]);
    assert!(fx.navigation.last().is_none());
}

#[tokio::test]
async fn retry_imports_the_fresh_secret_never_a_leftover() {
    let fx = bootstrap_fixture();

    fx.lookup.push_granted(KEY_A);
    fx.bridge
        .reject_next_import(None)
        .expect("inject import failure");
    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;
    assert!(fx.navigation.last().is_none());

    fx.lookup.push_granted(KEY_B);
    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let accounts = fx.bridge.accounts().expect("accounts");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].address, derive_import_address(KEY_B));

    let NavigationTarget::ImportSuccess(state) = fx.navigation.last().expect("navigation fired")
    else {
        panic!("expected import success navigation");
    };
    assert_eq!(state.accounts[0].account.address, derive_import_address(KEY_B));
}

#[tokio::test]
async fn retry_after_denial_matches_a_first_attempt_success() {
    let fx = bootstrap_fixture();

    fx.lookup.push_denied();
    fx.bootstrap.submit(ACCOUNT_ID, "wrong-password-1").await;
    assert!(!fx
        .bootstrap
        .form()
        .field_errors(FormField::Password)
        .is_empty());

    fx.lookup.push_granted(KEY_A);
    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    assert!(fx.bootstrap.form().is_clean());
    let current = fx.bridge.current_account().await.expect("current account");
    assert_eq!(current.address, derive_import_address(KEY_A));
    assert!(matches!(
        fx.navigation.last(),
        Some(NavigationTarget::ImportSuccess(_))
    ));
}

#[tokio::test]
async fn unreachable_exchange_lands_on_the_password_field() {
    let fx = bootstrap_fixture();
    fx.lookup
        .push_error(PortError::Transport("connection refused".to_owned()));

    fx.bootstrap.submit(ACCOUNT_ID, PASSWORD).await;

    let errors = fx.bootstrap.form().field_errors(FormField::Password);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("account lookup failed"));
    assert!(fx.bridge.call_log().expect("call log").is_empty());
}

#[tokio::test]
async fn required_field_validation_runs_before_the_exchange() {
    let fx = bootstrap_fixture();

    fx.bootstrap.submit("", "").await;

    assert_eq!(
        fx.bootstrap.form().field_errors(FormField::Account),
        vec!["Please enter your Lunden account".to_owned()]
    );
    assert_eq!(
        fx.bootstrap.form().field_errors(FormField::Password),
        vec!["Please input Password".to_owned()]
    );
    assert_eq!(fx.lookup.exchange_count(), 0);

    fx.bootstrap.submit(ACCOUNT_ID, "short").await;
    assert_eq!(
        fx.bootstrap.form().field_errors(FormField::Password),
        vec!["Password must be at least 8 characters long".to_owned()]
    );
    assert_eq!(fx.lookup.exchange_count(), 0);
}

#[tokio::test]
async fn booted_but_locked_service_redirects_to_unlock() {
    let fx = bootstrap_fixture();
    fx.bridge.set_locked().expect("lock wallet");

    let redirected = fx
        .bootstrap
        .redirect_if_locked()
        .await
        .expect("precondition check");

    assert!(redirected);
    assert_eq!(fx.navigation.last(), Some(NavigationTarget::Unlock));
}

#[tokio::test]
async fn fresh_install_does_not_redirect() {
    let fx = bootstrap_fixture();

    let redirected = fx
        .bootstrap
        .redirect_if_locked()
        .await
        .expect("precondition check");

    assert!(!redirected);
    assert!(fx.navigation.last().is_none());
}
