//! Local decoding of the credential's expiry claim.
//!
//! The credential is an opaque signed JWT issued and validated by the
//! server. The client never verifies the signature; it only reads the
//! `exp` claim from the payload segment for pre-flight expiry checks.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Decode the expiry claim from a JWT credential.
/// Fails on anything that is not a three-segment token with a base64url
/// JSON payload carrying a numeric `exp`.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| anyhow!("Token is not a three-segment JWT"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .context("Failed to base64-decode token payload")?;

    let claims: Claims =
        serde_json::from_slice(&bytes).context("Failed to parse token claims")?;

    Utc.timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| anyhow!("Expiry claim out of range: {}", claims.exp))
}

/// Whether a credential's expiry claim is in the past.
/// Undecodable tokens are reported as expired so callers treat them
/// as invalid.
pub fn is_expired(token: &str) -> bool {
    match decode_expiry(token) {
        Ok(expiry) => expiry < Utc::now(),
        Err(_) => true,
    }
}
