//! Mode routing
//!
//! - Server mode (HTTP relay), the default
//! - Client mode (terminal commands against a running relay)

pub mod client;
pub mod server;

pub use client::run_client;
pub use server::run_server;
