use thiserror::Error;

use crate::db_types::{SessionId, TokenCode};

#[derive(Debug, Clone, Error)]
#[error("Token delivery failed: {0}")]
pub struct NotificationError(pub String);

/// The outbound channel that carries a confirmation code to a client.
///
/// The token never travels back to the caller of the payment flow; this channel is the only way
/// it leaves the system. A failed delivery must not abort or roll back payment initiation -
/// callers log it and publish it on the event hooks.
#[allow(async_fn_in_trait)]
pub trait TokenNotifier {
    async fn send_token(
        &self,
        email: &str,
        token: &TokenCode,
        session_id: &SessionId,
    ) -> Result<(), NotificationError>;
}
