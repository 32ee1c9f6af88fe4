use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::Duration;
use pwg_common::Money;
use wallet_payment_engine::{
    db_types::{NewClient, TokenCode},
    events::{EventHandlers, EventHooks, EventProducers},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        MemoryNotifier,
    },
    ClientManagement,
    LedgerApi,
    PaymentFlowApi,
    RegistryApi,
    SqliteDatabase,
    WalletLedgerError,
};

struct Harness {
    db: SqliteDatabase,
    notifier: MemoryNotifier,
    registry: RegistryApi<SqliteDatabase>,
    ledger: LedgerApi<SqliteDatabase>,
    payments: PaymentFlowApi<SqliteDatabase, MemoryNotifier>,
}

async fn harness() -> Harness {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let notifier = MemoryNotifier::new();
    Harness {
        db: db.clone(),
        notifier: notifier.clone(),
        registry: RegistryApi::new(db.clone()),
        ledger: LedgerApi::new(db.clone()),
        payments: PaymentFlowApi::new(db, notifier, EventProducers::default()),
    }
}

/// A token that is guaranteed not to match the given one.
fn wrong_token(token: &TokenCode) -> TokenCode {
    let wrong = if token.as_str() == "000000" { "000001" } else { "000000" };
    TokenCode::from(wrong.to_string())
}

#[tokio::test]
async fn full_flow_debits_exactly_once() {
    let h = harness().await;
    h.registry.register_client(NewClient::new("A1", "Ana", "a@x.com", "555")).await.unwrap();
    assert_eq!(h.ledger.balance("A1", "555").await.unwrap(), Money::from(0));

    let balance = h.ledger.recharge("A1", "555", Money::from(100)).await.unwrap();
    assert_eq!(balance, Money::from(100));

    let session_id = h.payments.initiate_payment("A1", "555", Money::from(40)).await.unwrap();
    let delivered = h.notifier.last().expect("Token was not delivered");
    assert_eq!(delivered.email, "a@x.com");
    assert_eq!(delivered.session_id, session_id);

    let new_balance = h.payments.confirm_payment(&session_id, &delivered.token, Money::from(40)).await.unwrap();
    assert_eq!(new_balance, Money::from(60));
    assert_eq!(h.ledger.balance("A1", "555").await.unwrap(), Money::from(60));

    // The session was consumed together with the debit; replaying it must fail.
    let err = h
        .payments
        .confirm_payment(&session_id, &delivered.token, Money::from(40))
        .await
        .expect_err("A consumed session must not be usable again");
    assert!(matches!(
        err,
        WalletLedgerError::WalletNotFound | WalletLedgerError::InvalidOrExpiredToken
    ));
    assert_eq!(h.ledger.balance("A1", "555").await.unwrap(), Money::from(60));
}

#[tokio::test]
async fn wrong_token_leaves_session_usable() {
    let h = harness().await;
    h.registry.register_client(NewClient::new("D4", "Dora", "d@x.com", "444")).await.unwrap();
    h.ledger.recharge("D4", "444", Money::from(1_000)).await.unwrap();
    let session_id = h.payments.initiate_payment("D4", "444", Money::from(300)).await.unwrap();
    let token = h.notifier.last().unwrap().token;

    let err = h
        .payments
        .confirm_payment(&session_id, &wrong_token(&token), Money::from(300))
        .await
        .expect_err("A wrong token must not confirm");
    assert!(matches!(err, WalletLedgerError::InvalidOrExpiredToken));
    assert_eq!(h.ledger.balance("D4", "444").await.unwrap(), Money::from(1_000));

    // The guess burned nothing; the real token still works.
    let balance = h.payments.confirm_payment(&session_id, &token, Money::from(300)).await.unwrap();
    assert_eq!(balance, Money::from(700));
}

#[tokio::test]
async fn insufficient_funds_keeps_the_session_pending() {
    let h = harness().await;
    h.registry.register_client(NewClient::new("E5", "Elias", "e@x.com", "515")).await.unwrap();
    h.ledger.recharge("E5", "515", Money::from(10)).await.unwrap();
    let session_id = h.payments.initiate_payment("E5", "515", Money::from(50)).await.unwrap();
    let token = h.notifier.last().unwrap().token;

    let err = h
        .payments
        .confirm_payment(&session_id, &token, Money::from(50))
        .await
        .expect_err("A debit past the balance must fail");
    assert!(matches!(err, WalletLedgerError::InsufficientFunds));
    assert_eq!(h.ledger.balance("E5", "515").await.unwrap(), Money::from(10));

    // The session survived the failed attempt; a smaller amount goes through.
    let balance = h.payments.confirm_payment(&session_id, &token, Money::from(10)).await.unwrap();
    assert_eq!(balance, Money::from(0));
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let h = harness().await;
    h.registry.register_client(NewClient::new("F6", "Fabio", "f@x.com", "616")).await.unwrap();
    h.ledger.recharge("F6", "616", Money::from(500)).await.unwrap();
    let payments = PaymentFlowApi::new(h.db.clone(), h.notifier.clone(), EventProducers::default())
        .with_token_ttl(Duration::zero());
    let session_id = payments.initiate_payment("F6", "616", Money::from(100)).await.unwrap();
    let token = h.notifier.last().unwrap().token;

    let err = payments
        .confirm_payment(&session_id, &token, Money::from(100))
        .await
        .expect_err("An expired token must not confirm");
    assert!(matches!(err, WalletLedgerError::InvalidOrExpiredToken));
    assert_eq!(h.ledger.balance("F6", "616").await.unwrap(), Money::from(500));
}

#[tokio::test]
async fn reinitiating_invalidates_the_previous_session() {
    let h = harness().await;
    h.registry.register_client(NewClient::new("G7", "Gina", "g@x.com", "717")).await.unwrap();
    h.ledger.recharge("G7", "717", Money::from(500)).await.unwrap();

    let first_session = h.payments.initiate_payment("G7", "717", Money::from(100)).await.unwrap();
    let first_token = h.notifier.last().unwrap().token;
    let second_session = h.payments.initiate_payment("G7", "717", Money::from(100)).await.unwrap();
    let second_token = h.notifier.last().unwrap().token;
    assert_ne!(first_session, second_session);

    let err = h
        .payments
        .confirm_payment(&first_session, &first_token, Money::from(100))
        .await
        .expect_err("An overwritten session must not confirm");
    assert!(matches!(err, WalletLedgerError::InvalidOrExpiredToken));

    let balance = h.payments.confirm_payment(&second_session, &second_token, Money::from(100)).await.unwrap();
    assert_eq!(balance, Money::from(400));
}

#[tokio::test]
async fn unknown_client_cannot_initiate() {
    let h = harness().await;
    let err = h
        .payments
        .initiate_payment("nobody", "000", Money::from(10))
        .await
        .expect_err("Unknown identities must be rejected");
    assert!(matches!(err, WalletLedgerError::ClientNotFound));
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn failed_delivery_keeps_the_session_and_fires_the_hook() {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.unwrap();
    let notifier = MemoryNotifier::new();

    let failures = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&failures);
    let mut hooks = EventHooks::default();
    hooks.on_token_delivery_failed(move |_event| {
        let seen = Arc::clone(&seen);
        Box::pin(async move {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    });
    let handlers = EventHandlers::new(8, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let registry = RegistryApi::new(db.clone());
    let payments = PaymentFlowApi::new(db.clone(), notifier.clone(), producers);
    registry.register_client(NewClient::new("H8", "Hugo", "h@x.com", "818")).await.unwrap();

    notifier.fail_next();
    let session_id = payments
        .initiate_payment("H8", "818", Money::from(10))
        .await
        .expect("A delivery failure must not fail initiation");

    // The session was written before the notifier ran, so it is live on the wallet.
    let client = db.fetch_client_by_document("H8").await.unwrap().unwrap();
    let wallet = db.fetch_wallet_for_client(client.id).await.unwrap().unwrap();
    assert_eq!(wallet.pending.as_ref().map(|s| s.session_id.clone()), Some(session_id));

    // The failure surfaced on the observability hook, not in the result.
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert!(notifier.sent().is_empty());
}
