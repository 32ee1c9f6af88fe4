//! Prepaid Wallet Payment Engine
//!
//! The engine holds the core logic for a prepaid wallet service: client registration, wallet
//! recharges, and a two-phase payment flow in which a short-lived one-time token is delivered to
//! the client out-of-band and presented back to authorize the debit. The library is
//! transport-agnostic; it knows nothing about HTTP or SMTP.
//!
//! The library is divided into three main sections:
//! 1. The storage contracts ([`mod@traits`]). Backends implement [`ClientManagement`] and
//!    [`WalletLedger`] to provide atomic persistence for client and wallet records. A SQLite
//!    implementation ships with the crate. You should never need to access the database directly;
//!    use the public API instead. The exception is the record types in [`db_types`], which are
//!    public.
//! 2. The public API ([`RegistryApi`], [`LedgerApi`], [`PaymentFlowApi`]). These own the business
//!    rules: identity checks, token issuance and verification, and the debit that consumes a
//!    session. Components are constructed explicitly with their collaborators.
//! 3. An event hook system ([`mod@events`]) that publishes payment confirmations and failed token
//!    deliveries so deployments can react to them without touching the payment flow itself.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;
mod wpe_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    ClientApiError,
    ClientManagement,
    NotificationError,
    TokenNotifier,
    WalletLedger,
    WalletLedgerError,
};
pub use wpe_api::{
    ledger_api::LedgerApi,
    payment_flow_api::{PaymentFlowApi, DEFAULT_TOKEN_TTL_SECONDS},
    registry_api::RegistryApi,
};
