//! # Prepaid wallet server
//!
//! This crate hosts the HTTP surface of the prepaid wallet gateway. It is responsible for:
//! * exposing the wallet operations over JSON endpoints,
//! * translating engine errors into the uniform response envelope and stable error codes,
//! * delivering confirmation tokens to clients via a transactional email HTTP API.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! * `GET  /health` - liveness check.
//! * `POST /wallet/register` - register a client and create their wallet.
//! * `POST /wallet/recharge` - add funds to a wallet.
//! * `POST /wallet/payment` - start a payment; emails a confirmation code.
//! * `POST /wallet/confirm-payment` - present the code and apply the debit.
//! * `GET  /wallet/balance` - read the wallet balance.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
