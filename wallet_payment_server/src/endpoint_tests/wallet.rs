use actix_web::{http::StatusCode, test, web, App};
use pwg_common::Money;
use serde_json::json;
use wallet_payment_engine::{
    events::EventProducers,
    test_utils::MemoryNotifier,
    ClientApiError,
    LedgerApi,
    PaymentFlowApi,
    RegistryApi,
    WalletLedgerError,
};

use crate::{
    data_objects::{ErrorCode, JsonResponse},
    endpoint_tests::{
        helpers::{client_fixture, session_fixture, wallet_fixture},
        mocks::MockBackend,
    },
    routes,
};

#[actix_web::test]
async fn register_returns_the_created_client() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document().returning(|_| Ok(None));
    mock.expect_insert_client_with_wallet().returning(|_| Ok(client_fixture()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(RegistryApi::new(mock)))
            .route("/wallet/register", web::post().to(routes::register::<MockBackend>)),
    )
    .await;

    let payload = json!({ "document": "A1", "name": "Ana", "email": "a@x.com", "phone": "555" });
    let req = test::TestRequest::post().uri("/wallet/register").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert!(body.success);
    assert!(body.error.is_none());
    assert_eq!(body.data.unwrap()["document"], "A1");
}

#[actix_web::test]
async fn duplicate_registration_maps_to_conflict() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document().returning(|_| Ok(Some(client_fixture())));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(RegistryApi::new(mock)))
            .route("/wallet/register", web::post().to(routes::register::<MockBackend>)),
    )
    .await;

    let payload = json!({ "document": "A1", "name": "Ana", "email": "a@x.com", "phone": "555" });
    let req = test::TestRequest::post().uri("/wallet/register").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert!(!body.success);
    assert_eq!(body.error, Some(ErrorCode::ClientExists));
}

#[actix_web::test]
async fn recharge_returns_the_new_balance() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document_and_phone().returning(|_, _| Ok(Some(client_fixture())));
    mock.expect_credit_wallet().returning(|_, _| Ok(Money::from(1_100)));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(LedgerApi::new(mock)))
            .route("/wallet/recharge", web::post().to(routes::recharge::<MockBackend>)),
    )
    .await;

    let payload = json!({ "document": "A1", "phone": "555", "amount": 100 });
    let req = test::TestRequest::post().uri("/wallet/recharge").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert!(body.success);
    assert_eq!(body.data.unwrap()["balance"], 1_100);
}

#[actix_web::test]
async fn non_positive_amounts_are_rejected_at_the_edge() {
    // The backend must never be consulted: no expectations are set.
    let mock = MockBackend::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(LedgerApi::new(mock)))
            .route("/wallet/recharge", web::post().to(routes::recharge::<MockBackend>)),
    )
    .await;

    let payload = json!({ "document": "A1", "phone": "555", "amount": 0 });
    let req = test::TestRequest::post().uri("/wallet/recharge").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert!(!body.success);
    assert!(body.error.is_none());
}

#[actix_web::test]
async fn balance_for_unknown_identity_is_not_found() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document_and_phone().returning(|_, _| Ok(None));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(LedgerApi::new(mock)))
            .route("/wallet/balance", web::get().to(routes::balance::<MockBackend>)),
    )
    .await;

    let req = test::TestRequest::get().uri("/wallet/balance?document=A1&phone=999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, Some(ErrorCode::ClientNotFound));
}

#[actix_web::test]
async fn initiation_returns_the_session_id_but_never_the_token() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document_and_phone().returning(|_, _| Ok(Some(client_fixture())));
    mock.expect_write_session().returning(|_, _| Ok(()));
    let notifier = MemoryNotifier::new();
    let api = PaymentFlowApi::new(mock, notifier.clone(), EventProducers::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .route("/wallet/payment", web::post().to(routes::initiate_payment::<MockBackend, MemoryNotifier>)),
    )
    .await;

    let payload = json!({ "document": "A1", "phone": "555", "amount": 40 });
    let req = test::TestRequest::post().uri("/wallet/payment").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert!(body.success);

    let delivered = notifier.last().expect("The token must travel through the notifier");
    assert_eq!(delivered.email, "a@x.com");
    let session_id = body.data.unwrap()["sessionId"].as_str().unwrap().to_string();
    assert_eq!(delivered.session_id.as_str(), session_id);
    // The token leaves the system through the notifier only.
    assert!(!body.message.contains(delivered.token.as_str()));
}

#[actix_web::test]
async fn confirmation_with_a_bad_token_is_unauthorized() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_wallet_by_live_session().returning(|_, _, _| Ok(None));
    let api = PaymentFlowApi::new(mock, MemoryNotifier::new(), EventProducers::default());
    let app = test::init_service(App::new().app_data(web::Data::new(api)).route(
        "/wallet/confirm-payment",
        web::post().to(routes::confirm_payment::<MockBackend, MemoryNotifier>),
    ))
    .await;

    let payload = json!({ "sessionId": "s-1", "token": "999999", "amount": 40 });
    let req = test::TestRequest::post().uri("/wallet/confirm-payment").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, Some(ErrorCode::InvalidOrExpiredToken));
}

#[actix_web::test]
async fn confirmation_past_the_balance_is_payment_required() {
    let mut mock = MockBackend::new();
    let session = session_fixture();
    mock.expect_fetch_wallet_by_live_session()
        .returning(move |_, _, _| Ok(Some(wallet_fixture(10, Some(session.clone())))));
    mock.expect_debit_wallet().returning(|_, _| Err(WalletLedgerError::InsufficientFunds));
    let api = PaymentFlowApi::new(mock, MemoryNotifier::new(), EventProducers::default());
    let app = test::init_service(App::new().app_data(web::Data::new(api)).route(
        "/wallet/confirm-payment",
        web::post().to(routes::confirm_payment::<MockBackend, MemoryNotifier>),
    ))
    .await;

    let payload = json!({ "sessionId": "s-1", "token": "123456", "amount": 50 });
    let req = test::TestRequest::post().uri("/wallet/confirm-payment").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, Some(ErrorCode::InsufficientFunds));
}

#[actix_web::test]
async fn backend_failures_are_masked_as_internal_errors() {
    let mut mock = MockBackend::new();
    mock.expect_fetch_client_by_document()
        .returning(|_| Err(ClientApiError::DatabaseError("connection refused to sqlite://secret-host".to_string())));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(RegistryApi::new(mock)))
            .route("/wallet/register", web::post().to(routes::register::<MockBackend>)),
    )
    .await;

    let payload = json!({ "document": "A1", "name": "Ana", "email": "a@x.com", "phone": "555" });
    let req = test::TestRequest::post().uri("/wallet/register").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: JsonResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, Some(ErrorCode::InternalError));
    // The underlying cause stays in the logs.
    assert!(!body.message.contains("secret-host"));
}
