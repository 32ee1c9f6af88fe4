use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     ErrorCode       ---------------------------------------------------------
/// The stable error codes surfaced in the response envelope. Internal failure details never
/// travel with them; the code is all a caller gets to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ClientExists,
    ClientNotFound,
    WalletNotFound,
    InvalidOrExpiredToken,
    InsufficientFunds,
    InternalError,
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::ClientExists => "CLIENT_EXISTS",
            ErrorCode::ClientNotFound => "CLIENT_NOT_FOUND",
            ErrorCode::WalletNotFound => "WALLET_NOT_FOUND",
            ErrorCode::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(code)
    }
}

//--------------------------------------    JsonResponse     ---------------------------------------------------------
/// The uniform response envelope. Every endpoint returns this shape, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string(), data: None, error: None }
    }

    pub fn with_data<S: Display>(message: S, data: Value) -> Self {
        Self { success: true, message: message.to_string(), data: Some(data), error: None }
    }

    pub fn failure<S: Display>(message: S, error: Option<ErrorCode>) -> Self {
        Self { success: false, message: message.to_string(), data: None, error }
    }
}

//--------------------------------------     Requests        ---------------------------------------------------------
// Amounts are integer minor units (cents).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub document: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargeRequest {
    pub document: String,
    pub phone: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub document: String,
    pub phone: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub session_id: String,
    pub token: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub document: String,
    pub phone: String,
}
