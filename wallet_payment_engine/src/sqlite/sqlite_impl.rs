//! `SqliteDatabase` is the concrete SQLite backend for the wallet payment engine.
//!
//! It implements the storage traits defined in the [`traits`](crate::traits) module on top of an
//! `SqlitePool`. The wallet mutations are single atomic statements; only the client+wallet pair
//! creation needs an explicit transaction.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::debug;
use pwg_common::Money;
use sqlx::SqlitePool;

use super::db::{clients, wallets};
use crate::{
    db_types::{Client, NewClient, PendingSession, SessionId, TokenCode, Wallet},
    traits::{ClientApiError, ClientManagement, WalletLedger, WalletLedgerError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = super::db::new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ClientManagement for SqliteDatabase {
    async fn fetch_client_by_document_and_phone(
        &self,
        document: &str,
        phone: &str,
    ) -> Result<Option<Client>, ClientApiError> {
        let mut conn = self.pool.acquire().await?;
        clients::client_by_document_and_phone(document, phone, &mut conn).await
    }

    async fn fetch_client_by_document(&self, document: &str) -> Result<Option<Client>, ClientApiError> {
        let mut conn = self.pool.acquire().await?;
        clients::client_by_document(document, &mut conn).await
    }

    async fn insert_client_with_wallet(&self, client: NewClient) -> Result<Client, ClientApiError> {
        let mut tx = self.pool.begin().await?;
        let created = clients::insert_client(&client, &mut tx).await?;
        wallets::insert_wallet(created.id, &mut tx).await.map_err(ClientApiError::from)?;
        tx.commit().await?;
        debug!("🗃️ Client {} saved with id {} and a zero-balance wallet", created.document, created.id);
        Ok(created)
    }

    async fn fetch_wallet_for_client(&self, client_id: i64) -> Result<Option<Wallet>, ClientApiError> {
        let mut conn = self.pool.acquire().await?;
        wallets::wallet_for_client(client_id, &mut conn).await.map_err(ClientApiError::from)
    }
}

impl WalletLedger for SqliteDatabase {
    async fn credit_wallet(&self, client_id: i64, amount: Money) -> Result<Money, WalletLedgerError> {
        let mut conn = self.pool.acquire().await?;
        let balance = wallets::credit_wallet(client_id, amount, &mut conn)
            .await?
            .ok_or(WalletLedgerError::WalletNotFound)?;
        debug!("🗃️ Wallet of client #{client_id} credited with {amount}. New balance {balance}");
        Ok(balance)
    }

    async fn write_session(&self, client_id: i64, session: &PendingSession) -> Result<(), WalletLedgerError> {
        let mut conn = self.pool.acquire().await?;
        if !wallets::write_session(client_id, session, &mut conn).await? {
            return Err(WalletLedgerError::WalletNotFound);
        }
        debug!("🗃️ Session {} written to wallet of client #{client_id}", session.session_id);
        Ok(())
    }

    async fn fetch_wallet_by_live_session(
        &self,
        session_id: &SessionId,
        token: &TokenCode,
        now: DateTime<Utc>,
    ) -> Result<Option<Wallet>, WalletLedgerError> {
        let mut conn = self.pool.acquire().await?;
        wallets::wallet_by_live_session(session_id, token, now, &mut conn).await
    }

    async fn debit_wallet(&self, session_id: &SessionId, amount: Money) -> Result<Money, WalletLedgerError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(balance) = wallets::debit_and_clear_session(session_id, amount, &mut conn).await? {
            debug!("🗃️ Debited {amount} against session {session_id}. New balance {balance}");
            return Ok(balance);
        }
        // Zero rows matched: the session is gone, or the balance was short at the instant the
        // update ran. The follow-up read tells the two apart.
        match wallets::wallet_by_session_id(session_id, &mut conn).await? {
            Some(_) => Err(WalletLedgerError::InsufficientFunds),
            None => Err(WalletLedgerError::WalletNotFound),
        }
    }
}
