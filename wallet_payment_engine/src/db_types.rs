use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pwg_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row, Type};

//--------------------------------------     SessionId       ---------------------------------------------------------
/// The correlation handle for a pending payment. Returned to the caller at initiation and
/// presented again, together with the token, at confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct SessionId(pub String);

impl FromStr for SessionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     TokenCode       ---------------------------------------------------------
/// The one-time confirmation code delivered to the client out-of-band.
///
/// The code is a bearer credential, so it is masked in `Debug` and `Display` output. Use
/// [`TokenCode::as_str`] where the actual digits are required (i.e. when composing the
/// notification message).
#[derive(Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct TokenCode(String);

impl From<String> for TokenCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Debug for TokenCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCode(******)")
    }
}

impl Display for TokenCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("******")
    }
}

impl TokenCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      Client        ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    /// The externally assigned identity document number. Globally unique.
    pub document: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewClient       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub document: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewClient {
    pub fn new<S: Into<String>>(document: S, name: S, email: S, phone: S) -> Self {
        Self { document: document.into(), name: name.into(), email: email.into(), phone: phone.into() }
    }
}

//--------------------------------------   PendingSession    ---------------------------------------------------------
/// The window between payment initiation and confirmation.
///
/// A wallet carries at most one of these; issuing a new session overwrites the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSession {
    pub session_id: SessionId,
    pub token: TokenCode,
    pub expires_at: DateTime<Utc>,
}

impl PendingSession {
    /// A session is live strictly before its expiry instant.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

//--------------------------------------      Wallet        ----------------------------------------------------------
/// The mutable balance record owned one-to-one by a client.
///
/// "No pending session" is modelled as `None` rather than as sentinel values on loose fields; the
/// three underlying columns are NULL together or present together.
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: i64,
    pub client_id: i64,
    pub balance: Money,
    pub pending: Option<PendingSession>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn has_live_session(&self, now: DateTime<Utc>) -> bool {
        self.pending.as_ref().map(|s| s.is_live(now)).unwrap_or(false)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wallet {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let session_id: Option<SessionId> = row.try_get("session_id")?;
        let token: Option<TokenCode> = row.try_get("token")?;
        let expires_at: Option<DateTime<Utc>> = row.try_get("token_expires_at")?;
        let pending = match (session_id, token, expires_at) {
            (Some(session_id), Some(token), Some(expires_at)) => {
                Some(PendingSession { session_id, token, expires_at })
            },
            _ => None,
        };
        Ok(Self {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            balance: row.try_get("balance")?,
            pending,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
