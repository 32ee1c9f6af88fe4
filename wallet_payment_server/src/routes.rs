//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat
//! and tidy 🙏
//!
//! Handlers are generic over the storage backend; the concrete types are filled in where the
//! server instance is assembled (see [`crate::server`]).
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use pwg_common::Money;
use serde_json::json;
use wallet_payment_engine::{
    db_types::{NewClient, SessionId, TokenCode},
    ClientManagement,
    LedgerApi,
    PaymentFlowApi,
    RegistryApi,
    TokenNotifier,
    WalletLedger,
};

use crate::{
    data_objects::{BalanceQuery, ConfirmPaymentRequest, JsonResponse, PaymentRequest, RechargeRequest, RegisterRequest},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------  Register  ---------------------------------------------------
pub async fn register<B: ClientManagement + 'static>(
    api: web::Data<RegistryApi<B>>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received registration request for document {}", req.document);
    let client = api.register_client(NewClient::new(req.document, req.name, req.email, req.phone)).await?;
    let data = serde_json::to_value(&client).map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Created().json(JsonResponse::with_data("Client registered successfully", data)))
}

// ----------------------------------------------  Recharge  ---------------------------------------------------
pub async fn recharge<B: ClientManagement + WalletLedger + 'static>(
    api: web::Data<LedgerApi<B>>,
    body: web::Json<RechargeRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received recharge request for document {}", req.document);
    let amount = positive_amount(req.amount)?;
    let balance = api.recharge(&req.document, &req.phone, amount).await?;
    let data = json!({ "balance": balance.value() });
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Wallet recharged successfully", data)))
}

// ------------------------------------------  Initiate payment  -----------------------------------------------
pub async fn initiate_payment<B, N>(
    api: web::Data<PaymentFlowApi<B, N>>,
    body: web::Json<PaymentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: ClientManagement + WalletLedger + 'static,
    N: TokenNotifier + 'static,
{
    let req = body.into_inner();
    trace!("💻️ Received payment initiation request for document {}", req.document);
    let amount = positive_amount(req.amount)?;
    let session_id = api.initiate_payment(&req.document, &req.phone, amount).await?;
    let data = json!({ "sessionId": session_id });
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Token sent to email", data)))
}

// ------------------------------------------  Confirm payment  ------------------------------------------------
pub async fn confirm_payment<B, N>(
    api: web::Data<PaymentFlowApi<B, N>>,
    body: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: ClientManagement + WalletLedger + 'static,
    N: TokenNotifier + 'static,
{
    let req = body.into_inner();
    trace!("💻️ Received payment confirmation request for session {}", req.session_id);
    let amount = positive_amount(req.amount)?;
    let session_id = SessionId::from(req.session_id);
    let token = TokenCode::from(req.token);
    let new_balance = api.confirm_payment(&session_id, &token, amount).await?;
    let data = json!({ "newBalance": new_balance.value() });
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Payment processed successfully", data)))
}

// ----------------------------------------------  Balance  ----------------------------------------------------
pub async fn balance<B: ClientManagement + WalletLedger + 'static>(
    api: web::Data<LedgerApi<B>>,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    trace!("💻️ Received balance request for document {}", query.document);
    let balance = api.balance(&query.document, &query.phone).await?;
    let data = json!({ "balance": balance.value() });
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Balance retrieved successfully", data)))
}

/// Request-shape validation for amounts. Rejected before the core is invoked.
fn positive_amount(amount: i64) -> Result<Money, ServerError> {
    if amount <= 0 {
        return Err(ServerError::InvalidRequestBody(format!("amount must be positive, got {amount}")));
    }
    Ok(Money::from(amount))
}
