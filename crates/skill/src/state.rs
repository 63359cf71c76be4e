//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::intents::IntentRouter;
use crate::magento::{CommerceSession, MagentoClient, ReqwestTransport};

/// Key for turns that arrive without a dialogue session id.
const DEFAULT_SESSION_KEY: &str = "";

const MAX_SESSIONS: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the Magento client
/// and one [`CommerceSession`] per dialogue session, dropped after the
/// configured idle time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    client: MagentoClient<ReqwestTransport>,
    router: IntentRouter<ReqwestTransport>,
    sessions: Cache<String, Arc<CommerceSession>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `client` - Magento API client
    /// * `session_idle` - How long an unused shopper session is kept
    #[must_use]
    pub fn new(client: MagentoClient<ReqwestTransport>, session_idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(session_idle)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                router: IntentRouter::new(client.clone()),
                client,
                sessions,
            }),
        }
    }

    /// Get a reference to the Magento API client.
    #[must_use]
    pub fn magento(&self) -> &MagentoClient<ReqwestTransport> {
        &self.inner.client
    }

    /// Get a reference to the intent router.
    #[must_use]
    pub fn router(&self) -> &IntentRouter<ReqwestTransport> {
        &self.inner.router
    }

    /// Get or create the commerce session for a dialogue session.
    ///
    /// Turns without a session id share one process-wide session.
    pub async fn session(&self, session_id: Option<&str>) -> Arc<CommerceSession> {
        let key = session_id.unwrap_or(DEFAULT_SESSION_KEY).to_string();
        self.inner
            .sessions
            .get_with(key, async { Arc::new(CommerceSession::new()) })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::magento::testing::test_config;

    fn state() -> AppState {
        let client = MagentoClient::new(&test_config()).unwrap();
        AppState::new(client, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_same_id_shares_session() {
        let state = state();
        let a = state.session(Some("session-1")).await;
        let b = state.session(Some("session-1")).await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_different_ids_get_separate_sessions() {
        let state = state();
        let a = state.session(Some("session-1")).await;
        let b = state.session(Some("session-2")).await;
        let anonymous = state.session(None).await;
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &anonymous));
        assert!(Arc::ptr_eq(&anonymous, &state.session(None).await));
    }
}
