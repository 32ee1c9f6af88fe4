use thiserror::Error;

use crate::db_types::{Client, NewClient, Wallet};

#[derive(Debug, Clone, Error)]
pub enum ClientApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A client with document {0} is already registered")]
    ClientAlreadyExists(String),
    #[error("Client not found")]
    ClientNotFound,
}

impl From<sqlx::Error> for ClientApiError {
    fn from(e: sqlx::Error) -> Self {
        ClientApiError::DatabaseError(e.to_string())
    }
}

/// The `ClientManagement` trait defines behaviour for managing client identity records.
///
/// Identity lookups always take the (document, phone) pair when they act as an authorization
/// check; the document-only lookup exists for uniqueness enforcement at registration.
#[allow(async_fn_in_trait)]
pub trait ClientManagement {
    /// Fetches the client matching both `document` and `phone` exactly, or `None`.
    async fn fetch_client_by_document_and_phone(
        &self,
        document: &str,
        phone: &str,
    ) -> Result<Option<Client>, ClientApiError>;

    /// Fetches the client with the given document number, or `None`.
    async fn fetch_client_by_document(&self, document: &str) -> Result<Option<Client>, ClientApiError>;

    /// Creates the client record and its zero-balance wallet in a single atomic unit.
    ///
    /// A client must never exist without a wallet. Returns [`ClientApiError::ClientAlreadyExists`]
    /// if the document is already registered.
    async fn insert_client_with_wallet(&self, client: NewClient) -> Result<Client, ClientApiError>;

    /// Fetches the wallet owned by the given client, or `None`.
    async fn fetch_wallet_for_client(&self, client_id: i64) -> Result<Option<Wallet>, ClientApiError>;
}
