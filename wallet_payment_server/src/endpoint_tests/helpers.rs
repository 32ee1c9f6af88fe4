use chrono::{Duration, Utc};
use pwg_common::Money;
use wallet_payment_engine::db_types::{Client, PendingSession, SessionId, TokenCode, Wallet};

pub fn client_fixture() -> Client {
    let now = Utc::now();
    Client {
        id: 1,
        document: "A1".to_string(),
        name: "Ana".to_string(),
        email: "a@x.com".to_string(),
        phone: "555".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn wallet_fixture(balance: i64, pending: Option<PendingSession>) -> Wallet {
    let now = Utc::now();
    Wallet { id: 1, client_id: 1, balance: Money::from(balance), pending, created_at: now, updated_at: now }
}

pub fn session_fixture() -> PendingSession {
    PendingSession {
        session_id: SessionId::from("11111111-2222-3333-4444-555555555555".to_string()),
        token: TokenCode::from("123456".to_string()),
        expires_at: Utc::now() + Duration::minutes(5),
    }
}
