//! KYC intake API server.
//!
//! HTTP surface over the `intake` library: cookie-authenticated auth
//! endpoints plus the multipart company-details flow. All document
//! processing lives in `intake`; this crate parses requests, enforces
//! auth, and maps errors to the response envelope.

pub mod config;
pub mod domains;
pub mod error;
pub mod server;

pub use config::Config;
pub use error::ApiError;
