use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{index_accounts, Account, ImportSuccessState, NavigationTarget};
use crate::error::SessionError;
use crate::ports::{CredentialLookupPort, NavigationPort, PortError, WalletServicePort};
use crate::runner::{RequestError, RequestRunner};

pub const MINIMUM_PASSWORD_LENGTH: usize = 8;

pub const IMPORT_SUCCESS_TITLE: &str = "Successfully created";

const ACCOUNT_REQUIRED: &str = "Please enter your Lunden account";
const PASSWORD_REQUIRED: &str = "Please input Password";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Account,
    Password,
    Key,
}

/// Field-scoped error sink shared between the bootstrap flow and the
/// surface rendering it. Failures land on exactly the input to fix;
/// nothing in this flow raises a global alert.
#[derive(Debug, Default)]
pub struct FormState {
    errors: Mutex<HashMap<FormField, Vec<String>>>,
}

impl FormState {
    pub fn set_field_errors(&self, field: FormField, errors: Vec<String>) {
        if let Ok(mut g) = self.errors.lock() {
            g.insert(field, errors);
        }
    }

    pub fn field_errors(&self, field: FormField) -> Vec<String> {
        self.errors
            .lock()
            .ok()
            .and_then(|g| g.get(&field).cloned())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut g) = self.errors.lock() {
            g.clear();
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors
            .lock()
            .map(|g| g.values().all(|v| v.is_empty()))
            .unwrap_or(false)
    }
}

/// Orchestrates the credential-gated provisioning sequence: exchange the
/// account credentials for a signing key, boot the background service,
/// then import the key.
///
/// Each submission is a fresh attempt; a booted-but-not-imported wallet
/// left behind by a failed attempt is not resumed, the whole sequence
/// re-runs. The exchanged key only ever travels as a call argument and is
/// dropped (zeroized) when the submission returns.
pub struct CredentialBootstrap<L, W, N>
where
    L: CredentialLookupPort,
    W: WalletServicePort,
    N: NavigationPort + 'static,
{
    lookup: L,
    wallet: Arc<W>,
    navigation: Arc<N>,
    form: Arc<FormState>,
    boot_runner: RequestRunner<()>,
    import_runner: RequestRunner<Vec<Account>>,
}

impl<L, W, N> CredentialBootstrap<L, W, N>
where
    L: CredentialLookupPort,
    W: WalletServicePort,
    N: NavigationPort + 'static,
{
    /// `imported_length` is the number of accounts that existed before
    /// this import; the first-boot surface passes 0.
    pub fn new(
        lookup: L,
        wallet: Arc<W>,
        navigation: Arc<N>,
        request_timeout: Duration,
        imported_length: usize,
    ) -> Self {
        let form = Arc::new(FormState::default());

        let boot_form = Arc::clone(&form);
        let boot_runner = RequestRunner::new(
            request_timeout,
            Box::new(|_: ()| {}),
            Box::new(move |err: RequestError| {
                let err = SessionError::IncorrectPassword(err.message().map(str::to_owned));
                apply_field_error(&boot_form, &err);
            }),
        );

        let import_form = Arc::clone(&form);
        let success_navigation = Arc::clone(&navigation);
        let import_runner = RequestRunner::new(
            request_timeout,
            Box::new(move |accounts: Vec<Account>| {
                let state = ImportSuccessState {
                    accounts: index_accounts(&accounts),
                    title: IMPORT_SUCCESS_TITLE.to_owned(),
                    editing: true,
                    imported_account: true,
                    imported_length,
                };
                if let Err(err) = success_navigation.replace(NavigationTarget::ImportSuccess(state))
                {
                    tracing::error!(error = %err, "import success navigation failed");
                }
            }),
            Box::new(move |err: RequestError| {
                let err = SessionError::InvalidKey(err.message().map(str::to_owned));
                apply_field_error(&import_form, &err);
            }),
        );

        Self {
            lookup,
            wallet,
            navigation,
            form,
            boot_runner,
            import_runner,
        }
    }

    /// Entry precondition: a service that is booted but locked gets the
    /// unlock surface instead of a second bootstrap.
    pub async fn redirect_if_locked(&self) -> Result<bool, PortError> {
        if self.wallet.is_booted().await? && !self.wallet.is_unlocked().await? {
            self.navigation.replace(NavigationTarget::Unlock)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Run one full submission. Failures never escape: every error lands
    /// on its form field and the sequence stops at the failing step.
    pub async fn submit(&self, account_id: &str, password: &str) {
        self.form.clear();
        if !self.validate(account_id, password) {
            return;
        }

        let response = match self.lookup.exchange(account_id, password).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "credential exchange unreachable");
                self.apply(&SessionError::CredentialExchange(err.to_string()));
                return;
            }
        };
        if !response.granted() {
            self.apply(&SessionError::InvalidCredential);
            return;
        }
        let Some(p_key) = response.p_key else {
            self.apply(&SessionError::CredentialExchange(
                "lookup granted access but returned no key".to_owned(),
            ));
            return;
        };

        let trimmed = password.trim();
        if !self.boot_runner.invoke(self.wallet.boot(trimmed)).await {
            // Boot failed; never proceed to import with this submission's
            // key, and never reuse the key on a later one.
            return;
        }

        self.import_runner
            .invoke(self.wallet.import_private_key(&p_key))
            .await;
    }

    pub fn is_submitting(&self) -> bool {
        self.boot_runner.is_loading() || self.import_runner.is_loading()
    }

    pub fn form(&self) -> Arc<FormState> {
        Arc::clone(&self.form)
    }

    fn validate(&self, account_id: &str, password: &str) -> bool {
        let mut ok = true;
        if account_id.trim().is_empty() {
            self.form
                .set_field_errors(FormField::Account, vec![ACCOUNT_REQUIRED.to_owned()]);
            ok = false;
        }
        let password = password.trim();
        if password.is_empty() {
            self.form
                .set_field_errors(FormField::Password, vec![PASSWORD_REQUIRED.to_owned()]);
            ok = false;
        } else if password.len() < MINIMUM_PASSWORD_LENGTH {
            self.form
                .set_field_errors(FormField::Password, vec![PASSWORD_TOO_SHORT.to_owned()]);
            ok = false;
        }
        ok
    }

    fn apply(&self, err: &SessionError) {
        apply_field_error(&self.form, err);
    }
}

fn apply_field_error(form: &FormState, err: &SessionError) {
    if let Some(field) = err.form_field() {
        form.set_field_errors(field, vec![err.to_string()]);
    }
}
