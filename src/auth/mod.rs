//! Authentication module for session and credential lifecycle.
//!
//! This module provides:
//! - `TokenStore`: injected durable storage for the identity/credential pair
//! - `SessionManager`: the Resolving -> Authenticated | Anonymous state machine
//! - `claims`: local decoding of the credential's expiry claim
//!
//! The credential is an opaque server-issued JWT; the client only reads
//! its expiry claim for pre-flight checks.

pub mod claims;
pub mod session;
pub mod token_store;

pub use session::{SessionManager, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
