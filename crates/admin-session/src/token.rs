//! Session token decoding.
//!
//! Tokens are compact signed-claims strings: `header.payload.signature`, each
//! segment URL-safe base64. Only the payload is read here.
//!
//! **No signature verification happens on this side.** The decoded claims
//! drive what the dashboard shows and which requests it attempts; the backend
//! re-verifies every token it receives and is the only authority. Never treat
//! [`is_valid`] as a security check.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Standard base64 that accepts segments with or without `=` padding.
///
/// Segments are mapped back from the URL-safe alphabet before decoding, so
/// payloads using either `-_` or `+/` are read.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const SEGMENT_COUNT: usize = 3;

/// Why a token could not be decoded.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Token does not have exactly three dot-separated segments
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    /// Payload segment is not valid URL-safe base64
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not a JSON object
    #[error("payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decoded token payload.
///
/// Unverified: see the module docs. Every claim is kept, including ones this
/// crate does not interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Expiry in seconds since the epoch, if present and numeric.
    pub fn exp(&self) -> Option<f64> {
        self.0.get("exp").and_then(Value::as_f64)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A claim's value when it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn role(&self) -> Option<&str> {
        self.get_str("role")
    }

    /// Expiry as a timestamp, if present and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.exp()? * 1000.0;
        if !millis.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt(millis as i64).single()
    }

    /// True unless `exp * 1000` is strictly after `now_millis`.
    ///
    /// A missing expiry counts as expired.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        match self.exp() {
            Some(exp) => exp * 1000.0 <= now_millis as f64,
            None => true,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decode the claims of `token` without verifying its signature.
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let segment: String = segments[1]
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    let payload = SEGMENT_ENGINE.decode(segment)?;
    let claims: Claims = serde_json::from_slice(&payload)?;
    Ok(claims)
}

/// Whether `token` is present, decodable, and not yet expired.
///
/// Advisory only; see the module docs.
pub fn is_valid(token: Option<&str>) -> bool {
    is_valid_at(token, Utc::now().timestamp_millis())
}

/// [`is_valid`] against an explicit clock in milliseconds since the epoch.
pub fn is_valid_at(token: Option<&str>, now_millis: i64) -> bool {
    let Some(token) = token else {
        return false;
    };

    match decode(token) {
        Ok(claims) => claims.exp().is_some() && !claims.is_expired_at(now_millis),
        Err(e) => {
            tracing::debug!(error = %e, "token failed to decode");
            false
        }
    }
}
