use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use thiserror::Error;
use wallet_payment_engine::{ClientApiError, WalletLedgerError};

use crate::data_objects::{ErrorCode, JsonResponse};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    RegistryError(#[from] ClientApiError),
    #[error("{0}")]
    PaymentError(#[from] WalletLedgerError),
}

impl ServerError {
    /// The stable code placed in the response envelope, if the failure maps to one.
    fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ServerError::RegistryError(e) => match e {
                ClientApiError::ClientAlreadyExists(_) => Some(ErrorCode::ClientExists),
                ClientApiError::ClientNotFound => Some(ErrorCode::ClientNotFound),
                ClientApiError::DatabaseError(_) => Some(ErrorCode::InternalError),
            },
            ServerError::PaymentError(e) => match e {
                WalletLedgerError::ClientNotFound => Some(ErrorCode::ClientNotFound),
                WalletLedgerError::WalletNotFound => Some(ErrorCode::WalletNotFound),
                WalletLedgerError::InvalidOrExpiredToken => Some(ErrorCode::InvalidOrExpiredToken),
                WalletLedgerError::InsufficientFunds => Some(ErrorCode::InsufficientFunds),
                WalletLedgerError::NonPositiveAmount(_) => None,
                WalletLedgerError::DatabaseError(_) => Some(ErrorCode::InternalError),
            },
            ServerError::InvalidRequestBody(_) => None,
            _ => Some(ErrorCode::InternalError),
        }
    }

    fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::RegistryError(e) => match e {
                ClientApiError::ClientAlreadyExists(_) => StatusCode::CONFLICT,
                ClientApiError::ClientNotFound => StatusCode::NOT_FOUND,
                ClientApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::PaymentError(e) => match e {
                WalletLedgerError::ClientNotFound => StatusCode::NOT_FOUND,
                WalletLedgerError::WalletNotFound => StatusCode::NOT_FOUND,
                WalletLedgerError::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
                WalletLedgerError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
                WalletLedgerError::NonPositiveAmount(_) => StatusCode::BAD_REQUEST,
                WalletLedgerError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            ServerError::InitializeError(_)
            | ServerError::BackendError(_)
            | ServerError::IOError(_)
            | ServerError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal causes stay in the logs; callers only see the stable code.
        let message = if self.is_internal() {
            error!("💻️ Internal error while handling a request: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = JsonResponse::failure(message, self.error_code());
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).json(body)
    }
}
