use chrono::{DateTime, Utc};
use log::trace;
use pwg_common::Money;
use sqlx::SqliteConnection;

use crate::{
    db_types::{PendingSession, SessionId, TokenCode, Wallet},
    traits::WalletLedgerError,
};

const WALLET_COLUMNS: &str = "id, client_id, balance, session_id, token, token_expires_at, created_at, updated_at";

pub async fn insert_wallet(client_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO wallets (client_id, balance) VALUES (?, 0)").bind(client_id).execute(conn).await?;
    Ok(())
}

pub async fn wallet_for_client(
    client_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Wallet>, sqlx::Error> {
    let q = format!("SELECT {WALLET_COLUMNS} FROM wallets WHERE client_id = ?");
    sqlx::query_as::<_, Wallet>(&q).bind(client_id).fetch_optional(conn).await
}

/// Adds `amount` to the stored balance in a single UPDATE, so concurrent credits cannot lose each
/// other's increments. Returns the new balance, or `None` if the client has no wallet.
pub async fn credit_wallet(
    client_id: i64,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Money>, WalletLedgerError> {
    let balance = sqlx::query_scalar::<_, Money>(
        r#"UPDATE wallets SET
       balance = balance + ?,
       updated_at = CURRENT_TIMESTAMP
       WHERE client_id = ?
       RETURNING balance"#,
    )
    .bind(amount)
    .bind(client_id)
    .fetch_optional(conn)
    .await?;
    Ok(balance)
}

/// Writes the session fields onto the wallet, replacing whatever was there. Returns false if the
/// client has no wallet.
pub async fn write_session(
    client_id: i64,
    session: &PendingSession,
    conn: &mut SqliteConnection,
) -> Result<bool, WalletLedgerError> {
    let result = sqlx::query(
        r#"UPDATE wallets SET
       session_id = ?,
       token = ?,
       token_expires_at = ?,
       updated_at = CURRENT_TIMESTAMP
       WHERE client_id = ?"#,
    )
    .bind(session.session_id.as_str())
    .bind(session.token.as_str())
    .bind(session.expires_at)
    .bind(client_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetches the wallet whose pending session matches the session id AND the token AND is still
/// unexpired at `now`. All three must match; a miss on any of them looks identical to the caller.
pub async fn wallet_by_live_session(
    session_id: &SessionId,
    token: &TokenCode,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Wallet>, WalletLedgerError> {
    let q = format!(
        "SELECT {WALLET_COLUMNS} FROM wallets WHERE session_id = ? AND token = ? AND token_expires_at > ?"
    );
    let wallet = sqlx::query_as::<_, Wallet>(&q)
        .bind(session_id.as_str())
        .bind(token.as_str())
        .bind(now)
        .fetch_optional(conn)
        .await?;
    Ok(wallet)
}

pub async fn wallet_by_session_id(
    session_id: &SessionId,
    conn: &mut SqliteConnection,
) -> Result<Option<Wallet>, WalletLedgerError> {
    let q = format!("SELECT {WALLET_COLUMNS} FROM wallets WHERE session_id = ?");
    let wallet = sqlx::query_as::<_, Wallet>(&q).bind(session_id.as_str()).fetch_optional(conn).await?;
    Ok(wallet)
}

/// The debit itself: one conditional UPDATE that decrements the balance and clears the session
/// fields together. The filter on `session_id` makes a consumed session unmatchable (so a
/// duplicate confirm touches zero rows), and the filter on `balance` keeps the balance
/// non-negative without a read-then-write gap.
///
/// Returns the new balance, or `None` if no row matched.
pub async fn debit_and_clear_session(
    session_id: &SessionId,
    amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Money>, WalletLedgerError> {
    let balance = sqlx::query_scalar::<_, Money>(
        r#"UPDATE wallets SET
       balance = balance - ?1,
       session_id = NULL,
       token = NULL,
       token_expires_at = NULL,
       updated_at = CURRENT_TIMESTAMP
       WHERE session_id = ?2 AND balance >= ?1
       RETURNING balance"#,
    )
    .bind(amount)
    .bind(session_id.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(balance) = &balance {
        trace!("🗃️ Session {session_id} consumed. New balance {balance}");
    }
    Ok(balance)
}
