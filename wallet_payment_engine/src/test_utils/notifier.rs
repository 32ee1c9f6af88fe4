use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
    Mutex,
};

use crate::{
    db_types::{SessionId, TokenCode},
    traits::{NotificationError, TokenNotifier},
};

/// A token captured by the [`MemoryNotifier`].
#[derive(Debug, Clone)]
pub struct SentToken {
    pub email: String,
    pub token: TokenCode,
    pub session_id: SessionId,
}

/// An in-memory [`TokenNotifier`] for tests. Captures every delivered token so tests can play the
/// role of the client reading their email, and can be told to fail the next delivery.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<SentToken>>>,
    fail_next: Arc<AtomicBool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentToken> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SentToken> {
        self.sent.lock().unwrap().last().cloned()
    }

    /// The next `send_token` call will fail with a simulated outage.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl TokenNotifier for MemoryNotifier {
    async fn send_token(
        &self,
        email: &str,
        token: &TokenCode,
        session_id: &SessionId,
    ) -> Result<(), NotificationError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(NotificationError("simulated delivery outage".to_string()));
        }
        self.sent.lock().unwrap().push(SentToken {
            email: email.to_string(),
            token: token.clone(),
            session_id: session_id.clone(),
        });
        Ok(())
    }
}
