//! Wallet recharges and balance reads.

use std::fmt::Debug;

use log::debug;
use pwg_common::Money;

use crate::{
    db_types::Client,
    traits::{ClientManagement, WalletLedger, WalletLedgerError},
};

/// The `LedgerApi` exposes the balance operations that do not involve a payment session:
/// recharging a wallet and reading its balance. Both are gated by the (document, phone) identity
/// check.
pub struct LedgerApi<B> {
    db: B,
}

impl<B> Debug for LedgerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerApi")
    }
}

impl<B> LedgerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> LedgerApi<B>
where B: ClientManagement + WalletLedger
{
    /// Adds `amount` to the client's wallet and returns the new balance.
    ///
    /// `amount` must be strictly positive. The credit is applied atomically against the stored
    /// balance, so concurrent recharges to the same wallet all land.
    pub async fn recharge(&self, document: &str, phone: &str, amount: Money) -> Result<Money, WalletLedgerError> {
        if !amount.is_positive() {
            return Err(WalletLedgerError::NonPositiveAmount(amount));
        }
        let client = self.find_client(document, phone).await?;
        let new_balance = self.db.credit_wallet(client.id, amount).await?;
        debug!("💰️ Wallet of {document} recharged with {amount}. New balance {new_balance}");
        Ok(new_balance)
    }

    /// Returns the current wallet balance for the client.
    pub async fn balance(&self, document: &str, phone: &str) -> Result<Money, WalletLedgerError> {
        let client = self.find_client(document, phone).await?;
        let wallet = self
            .db
            .fetch_wallet_for_client(client.id)
            .await
            .map_err(WalletLedgerError::from)?
            .ok_or(WalletLedgerError::WalletNotFound)?;
        Ok(wallet.balance)
    }

    async fn find_client(&self, document: &str, phone: &str) -> Result<Client, WalletLedgerError> {
        self.db
            .fetch_client_by_document_and_phone(document, phone)
            .await
            .map_err(WalletLedgerError::from)?
            .ok_or(WalletLedgerError::ClientNotFound)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
