//! shortlink-relay - URL shortening through a credential-hiding relay
//!
//! A thin HTTP backend keeps the link provider's API key server-side,
//! validates shorten requests and maps provider failures onto stable local
//! error codes. The same crate ships a terminal client with a capped local
//! history.
//!
//! # Architecture
//! - `utils`: URL and slug validators
//! - `provider`: link provider trait and its HTTP client
//! - `services`: shorten proxy and credential probe
//! - `api`: actix-web handlers and middleware
//! - `history`: capped client-side history over a key-value store
//! - `client`: relay client and view state machine
//! - `config`: static configuration (TOML + env)
//! - `runtime`: server/client modes and lifecycle
//! - `system`: logging and panic handling
//! - `errors` / `error_code`: crate error type and the stable wire error codes

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error_code;
pub mod errors;
pub mod history;
pub mod interfaces;
pub mod provider;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
