use pwg_common::Money;

use crate::db_types::SessionId;

/// Published when a confirmation consumed a session and the debit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmedEvent {
    pub client_id: i64,
    pub session_id: SessionId,
    pub amount: Money,
    pub new_balance: Money,
}

impl PaymentConfirmedEvent {
    pub fn new(client_id: i64, session_id: SessionId, amount: Money, new_balance: Money) -> Self {
        Self { client_id, session_id, amount, new_balance }
    }
}

/// Published when the notifier could not deliver a token.
///
/// The session stays valid; this event is the only place the failure surfaces, since the
/// initiation result deliberately does not report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDeliveryFailedEvent {
    pub email: String,
    pub session_id: SessionId,
    pub reason: String,
}

impl TokenDeliveryFailedEvent {
    pub fn new(email: String, session_id: SessionId, reason: String) -> Self {
        Self { email, session_id, reason }
    }
}
