//! Client registration and identity checks.

use std::fmt::Debug;

use log::debug;

use crate::{
    db_types::{Client, NewClient},
    traits::{ClientApiError, ClientManagement},
};

/// The `RegistryApi` owns client identity records: creation with uniqueness enforcement, and the
/// (document, phone) lookup that callers use to prove ownership of an account.
pub struct RegistryApi<B> {
    db: B,
}

impl<B> Debug for RegistryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegistryApi")
    }
}

impl<B> RegistryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> RegistryApi<B>
where B: ClientManagement
{
    /// Registers a new client and creates their zero-balance wallet in the same atomic unit.
    ///
    /// Fails with [`ClientApiError::ClientAlreadyExists`] if the document is taken. The document
    /// check and the insert are not a single operation; the UNIQUE constraint in the backend
    /// catches the race between two concurrent registrations.
    pub async fn register_client(&self, client: NewClient) -> Result<Client, ClientApiError> {
        if self.db.fetch_client_by_document(&client.document).await?.is_some() {
            debug!("🧑️ Registration rejected. Document {} is already taken", client.document);
            return Err(ClientApiError::ClientAlreadyExists(client.document));
        }
        let created = self.db.insert_client_with_wallet(client).await?;
        debug!("🧑️ Client {} registered with a zero-balance wallet", created.document);
        Ok(created)
    }

    /// Fetches the client matching both `document` and `phone`. Presenting both is the
    /// authorization check for every wallet operation.
    pub async fn find_client(&self, document: &str, phone: &str) -> Result<Client, ClientApiError> {
        self.db
            .fetch_client_by_document_and_phone(document, phone)
            .await?
            .ok_or(ClientApiError::ClientNotFound)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
