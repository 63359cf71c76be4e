//! Credentials owned by one logical shopper.
//!
//! Tokens move through `unset -> pending -> valid`. "Pending" is the time the
//! session lock is held while the issue request is in flight; a failed
//! request leaves the slot unset so the next call starts over. Valid tokens
//! are kept until the backend rejects one with a 401.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, MutexGuard};
use voicecart_core::CartId;

use super::TokenRole;

/// Session-scoped credential context passed into every Magento call.
///
/// Construct one per shopper (or per process for single-user tools) and
/// never share it implicitly. Concurrent calls on the same session are
/// serialized while prerequisites are acquired, so one session issues at
/// most one token request per role at a time.
#[derive(Debug, Default)]
pub struct CommerceSession {
    credentials: Mutex<SessionCredentials>,
}

/// The mutable single-slot state behind a [`CommerceSession`].
#[derive(Debug, Default)]
pub(crate) struct SessionCredentials {
    pub(crate) customer_token: Option<SecretString>,
    pub(crate) admin_token: Option<SecretString>,
    pub(crate) cart_id: Option<CartId>,
}

impl SessionCredentials {
    /// Drop the credentials tied to `role`.
    ///
    /// The cart id belongs to the customer token that acquired it, so it
    /// goes with it.
    pub(crate) fn forget(&mut self, role: TokenRole) {
        match role {
            TokenRole::Customer => {
                self.customer_token = None;
                self.cart_id = None;
            }
            TokenRole::Admin => self.admin_token = None,
        }
    }

    fn token(&self, role: TokenRole) -> Option<&SecretString> {
        match role {
            TokenRole::Customer => self.customer_token.as_ref(),
            TokenRole::Admin => self.admin_token.as_ref(),
        }
    }
}

/// Snapshot of what a session currently holds, without exposing secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// A customer token is cached.
    pub has_customer_token: bool,
    /// An admin token is cached.
    pub has_admin_token: bool,
    /// The active cart id, if acquired.
    pub cart_id: Option<CartId>,
}

impl CommerceSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionCredentials> {
        self.credentials.lock().await
    }

    /// Clear the credentials tied to `role` if `rejected` is still the
    /// cached token.
    ///
    /// A concurrent turn may already have replaced a rejected token; that
    /// newer token is kept. Returns whether anything was cleared.
    pub async fn invalidate(&self, role: TokenRole, rejected: &SecretString) -> bool {
        let mut credentials = self.lock().await;
        let current = credentials
            .token(role)
            .is_some_and(|token| token.expose_secret() == rejected.expose_secret());
        if current {
            credentials.forget(role);
        }
        current
    }

    /// Report which credentials are cached.
    pub async fn status(&self) -> SessionStatus {
        let credentials = self.lock().await;
        SessionStatus {
            has_customer_token: credentials.customer_token.is_some(),
            has_admin_token: credentials.admin_token.is_some(),
            cart_id: credentials.cart_id.clone(),
        }
    }
}
