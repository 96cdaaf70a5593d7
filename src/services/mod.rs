//! Business services shared by the HTTP handlers
//!
//! Services receive their provider and settings at construction and never
//! read configuration on their own.

pub mod probe;
pub mod shorten;

pub use probe::{AccountStats, AccountSummary, CredentialProbe, LinkLimit, ProbeFailure};
pub use shorten::{ShortenResult, ShortenService, ShortenSettings, map_provider_error};
