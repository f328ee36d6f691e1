//! Slack request signature verification (signing secret, `v0` scheme).

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `v0=<hex hmac>`.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";
/// Header carrying the request's unix timestamp.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
/// Requests older (or newer) than this many seconds are rejected.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 300;

/// Compute the `v0=` signature Slack would send for `body` at `timestamp`.
///
/// # Errors
///
/// Returns `AppError::Signature` if the MAC cannot be keyed with `secret`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String> {
    let mac = signed_mac(secret, timestamp, body)?;
    Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify the signature headers of an inbound webhook request.
///
/// `now` is the current unix time in seconds.
///
/// # Errors
///
/// Returns `AppError::Signature` when the secret is unset, a header is
/// missing, the timestamp is outside the allowed window, or the signature
/// does not match.
pub fn verify_request(secret: &str, headers: &HeaderMap, body: &[u8], now: i64) -> Result<()> {
    if secret.is_empty() {
        return Err(AppError::Signature("signing secret is not configured".into()));
    }

    let timestamp = header(headers, TIMESTAMP_HEADER)?;
    let signature = header(headers, SIGNATURE_HEADER)?;

    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| AppError::Signature(format!("invalid timestamp {timestamp:?}")))?;
    if now.abs_diff(sent_at) > MAX_CLOCK_SKEW_SECONDS.unsigned_abs() {
        return Err(AppError::Signature(format!(
            "timestamp {sent_at} outside allowed window"
        )));
    }

    let digest = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or_else(|| AppError::Signature("malformed signature header".into()))?;

    signed_mac(secret, timestamp, body)?
        .verify_slice(&digest)
        .map_err(|_| AppError::Signature("signature mismatch".into()))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Signature(format!("missing {name} header")))
}

fn signed_mac(secret: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Signature(format!("invalid signing secret: {err}")))?;
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    Ok(mac)
}
