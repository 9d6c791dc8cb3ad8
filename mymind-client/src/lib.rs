//! # mymind-client
//!
//! Blocking HTTP client for the MyMind backend.
//!
//! [`ApiClient`] wraps a `ureq::Agent` and attaches the acting role's
//! account id as `X-User-Id` on every authenticated request. Calls are
//! issued one at a time; timeouts come from [`mymind_core::Config`].

pub mod client;
pub mod error;

pub use client::{ApiClient, ServerMessage, USER_ID_HEADER};
pub use error::ApiError;
