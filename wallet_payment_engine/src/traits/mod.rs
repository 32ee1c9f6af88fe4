//! # Storage and delivery contracts.
//!
//! This module defines the interface contracts that backends must implement to support the wallet
//! payment engine.
//!
//! ## Clients and wallets
//! A client is an identity record keyed by a unique document number; every client owns exactly one
//! wallet, created with it in the same atomic unit. The wallet row is the sole unit of shared
//! mutable state in the system: its balance and its (at most one) pending payment session.
//!
//! ## Traits
//! * [`ClientManagement`] covers identity records and the paired client+wallet creation.
//! * [`WalletLedger`] covers every wallet mutation. Implementations must make each mutation a
//!   single atomic read-modify-write keyed on current state, so that concurrent callers can never
//!   lose an update or consume a payment session twice.
//! * [`TokenNotifier`] is the outbound delivery channel for confirmation codes. Delivery failure
//!   is reportable, never fatal to the payment flow.
mod client_management;
mod notification;
mod wallet_ledger;

pub use client_management::{ClientApiError, ClientManagement};
pub use notification::{NotificationError, TokenNotifier};
pub use wallet_ledger::{WalletLedger, WalletLedgerError};
