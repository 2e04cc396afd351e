//! Compact token decoding.
//!
//! Only the claims segment is read. The signature segment is never checked:
//! trust is delegated to the backend that issued the token, and anything
//! decoded here must be treated as a hint for routing, not as proof.

use crate::error::DecodeError;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded claims of a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Wrap an already-parsed JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw claim value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `exp` claim in seconds since the epoch, when numeric.
    pub fn exp(&self) -> Option<f64> {
        self.0.get("exp").and_then(Value::as_f64)
    }

    /// `sub` claim, when a string.
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// Underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Decode the claims segment of a compact `header.claims.signature` token.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let segment = token.split('.').nth(1).ok_or(DecodeError::MissingSegment)?;

    let bytes = STANDARD
        .decode(to_standard_alphabet(segment))
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(Claims(map)),
        Ok(_) => Err(DecodeError::NotAnObject),
        Err(e) => Err(DecodeError::InvalidJson(e.to_string())),
    }
}

/// Translate base64url into padded standard base64.
fn to_standard_alphabet(segment: &str) -> String {
    let mut out: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}

/// Read-only access to wherever the client keeps its token.
///
/// The guard never reaches for storage itself; callers hand it a source
/// built from the request (cookie jar, header, fixture).
pub trait TokenSource {
    /// The stored token, if any. Empty values count as absent.
    fn token(&self) -> Option<&str>;
}

impl TokenSource for Option<&str> {
    fn token(&self) -> Option<&str> {
        self.filter(|t| !t.is_empty())
    }
}

impl TokenSource for Option<String> {
    fn token(&self) -> Option<&str> {
        self.as_deref().filter(|t| !t.is_empty())
    }
}
