use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Client, NewClient},
    traits::ClientApiError,
};

const CLIENT_COLUMNS: &str = "id, document, name, email, phone, created_at, updated_at";

pub async fn client_by_document_and_phone(
    document: &str,
    phone: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Client>, ClientApiError> {
    let q = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE document = ? AND phone = ?");
    let client = sqlx::query_as::<_, Client>(&q).bind(document).bind(phone).fetch_optional(conn).await?;
    Ok(client)
}

pub async fn client_by_document(
    document: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Client>, ClientApiError> {
    let q = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE document = ?");
    let client = sqlx::query_as::<_, Client>(&q).bind(document).fetch_optional(conn).await?;
    Ok(client)
}

/// Inserts the client record and returns it. A duplicate document trips the UNIQUE constraint and
/// is reported as [`ClientApiError::ClientAlreadyExists`].
pub async fn insert_client(client: &NewClient, conn: &mut SqliteConnection) -> Result<Client, ClientApiError> {
    let q = format!(
        "INSERT INTO clients (document, name, email, phone) VALUES (?, ?, ?, ?) RETURNING {CLIENT_COLUMNS}"
    );
    let result = sqlx::query_as::<_, Client>(&q)
        .bind(&client.document)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .fetch_one(conn)
        .await;
    match result {
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            debug!("🧑️ Document {} is already registered", client.document);
            Err(ClientApiError::ClientAlreadyExists(client.document.clone()))
        },
        Err(e) => Err(e.into()),
        Ok(client) => Ok(client),
    }
}
