//! System-level modules
//!
//! - Logging initialization
//! - Panic hook (crash report, fail-fast in production)

pub mod logging;
pub mod panic_handler;
