use chrono::{DateTime, Utc};
use pwg_common::Money;
use thiserror::Error;

use crate::{
    db_types::{PendingSession, SessionId, TokenCode, Wallet},
    traits::ClientApiError,
};

#[derive(Debug, Clone, Error)]
pub enum WalletLedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Client not found")]
    ClientNotFound,
    #[error("No wallet holds a pending session for this session id")]
    WalletNotFound,
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Money),
}

impl From<sqlx::Error> for WalletLedgerError {
    fn from(e: sqlx::Error) -> Self {
        WalletLedgerError::DatabaseError(e.to_string())
    }
}

impl From<ClientApiError> for WalletLedgerError {
    fn from(e: ClientApiError) -> Self {
        match e {
            ClientApiError::ClientNotFound => WalletLedgerError::ClientNotFound,
            other => WalletLedgerError::DatabaseError(other.to_string()),
        }
    }
}

/// The `WalletLedger` trait defines every wallet mutation and session lookup.
///
/// Contracts shared by all implementations:
/// * `balance >= 0` holds before and after every mutation.
/// * Every mutation is a single atomic read-modify-write against the wallet record, keyed on its
///   current state where relevant. No lost updates under concurrent callers.
/// * A wallet carries at most one pending session; consuming it clears the session fields in the
///   same mutation that applies the debit.
#[allow(async_fn_in_trait)]
pub trait WalletLedger {
    /// Adds `amount` to the wallet balance and returns the new balance.
    ///
    /// The increment must be applied against the stored balance, not a previously read copy, so
    /// that concurrent credits all land.
    async fn credit_wallet(&self, client_id: i64, amount: Money) -> Result<Money, WalletLedgerError>;

    /// Writes the pending session onto the wallet, overwriting any previous session.
    async fn write_session(&self, client_id: i64, session: &PendingSession) -> Result<(), WalletLedgerError>;

    /// Fetches the wallet whose pending session matches `session_id` AND `token` exactly AND has
    /// not expired at `now`. Does not mutate anything.
    async fn fetch_wallet_by_live_session(
        &self,
        session_id: &SessionId,
        token: &TokenCode,
        now: DateTime<Utc>,
    ) -> Result<Option<Wallet>, WalletLedgerError>;

    /// Atomically decrements the balance of the wallet holding the pending session `session_id`
    /// and clears the session fields, in one mutation. Returns the new balance.
    ///
    /// * [`WalletLedgerError::WalletNotFound`] - no wallet holds this session (never issued, or
    ///   already consumed by a concurrent confirmation). Of two concurrent debits for the same
    ///   session, exactly one succeeds and the other fails this way.
    /// * [`WalletLedgerError::InsufficientFunds`] - the wallet balance is short. The session is
    ///   left pending so the caller may retry before expiry.
    async fn debit_wallet(&self, session_id: &SessionId, amount: Money) -> Result<Money, WalletLedgerError>;
}
