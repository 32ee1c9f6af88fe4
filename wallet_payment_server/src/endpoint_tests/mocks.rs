use chrono::{DateTime, Utc};
use mockall::mock;
use pwg_common::Money;
use wallet_payment_engine::{
    db_types::{Client, NewClient, PendingSession, SessionId, TokenCode, Wallet},
    traits::{ClientApiError, ClientManagement, WalletLedger, WalletLedgerError},
};

mock! {
    pub Backend {}
    impl ClientManagement for Backend {
        async fn fetch_client_by_document_and_phone(&self, document: &str, phone: &str) -> Result<Option<Client>, ClientApiError>;
        async fn fetch_client_by_document(&self, document: &str) -> Result<Option<Client>, ClientApiError>;
        async fn insert_client_with_wallet(&self, client: NewClient) -> Result<Client, ClientApiError>;
        async fn fetch_wallet_for_client(&self, client_id: i64) -> Result<Option<Wallet>, ClientApiError>;
    }
    impl WalletLedger for Backend {
        async fn credit_wallet(&self, client_id: i64, amount: Money) -> Result<Money, WalletLedgerError>;
        async fn write_session(&self, client_id: i64, session: &PendingSession) -> Result<(), WalletLedgerError>;
        async fn fetch_wallet_by_live_session(&self, session_id: &SessionId, token: &TokenCode, now: DateTime<Utc>) -> Result<Option<Wallet>, WalletLedgerError>;
        async fn debit_wallet(&self, session_id: &SessionId, amount: Money) -> Result<Money, WalletLedgerError>;
    }
}
