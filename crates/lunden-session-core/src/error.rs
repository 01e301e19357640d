use thiserror::Error;

use crate::bootstrap::FormField;

/// Fallback shown when the boot call fails without a service message.
pub const INCORRECT_PASSWORD_FALLBACK: &str = "incorrect password";

/// Fallback shown when the import call fails without a service message.
pub const INVALID_KEY_FALLBACK: &str = "Not a valid private key";

/// Shown when the remote lookup answers but denies the credentials.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "Invalid account or password";

/// Session-level failure taxonomy.
///
/// The display string of each variant is exactly what the surface prints
/// into the offending form field; `PollingFetch` is the one transient
/// variant and is only ever logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("account lookup failed: {0}")]
    CredentialExchange(String),
    #[error("{}", INVALID_CREDENTIAL_MESSAGE)]
    InvalidCredential,
    #[error("{}", .0.as_deref().unwrap_or(INCORRECT_PASSWORD_FALLBACK))]
    IncorrectPassword(Option<String>),
    #[error("{}", .0.as_deref().unwrap_or(INVALID_KEY_FALLBACK))]
    InvalidKey(Option<String>),
    #[error("pending count refresh failed: {0}")]
    PollingFetch(String),
}

impl SessionError {
    /// The form field a failure is surfaced on. Field-scoped errors are
    /// never raised globally; `PollingFetch` is swallowed and has no field.
    pub fn form_field(&self) -> Option<FormField> {
        match self {
            SessionError::CredentialExchange(_)
            | SessionError::InvalidCredential
            | SessionError::IncorrectPassword(_) => Some(FormField::Password),
            SessionError::InvalidKey(_) => Some(FormField::Key),
            SessionError::PollingFetch(_) => None,
        }
    }
}
