//! Compact serialization codec
//!
//! Base64url (RFC 7515 section 2, no padding) for token segments, JSON object
//! segments, and assembly/splitting of the dot-separated wire format.

use crate::error::{JoseError, JoseResult};
use base64::{
    Engine as _, alphabet,
    engine::{
        DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::URL_SAFE_NO_PAD,
    },
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Segment separator of the compact serialization
pub const SEPARATOR: char = '.';

/// Segment count of a compact JWS
pub const JWS_SEGMENTS: usize = 3;

/// Segment count of a compact JWE
pub const JWE_SEGMENTS: usize = 5;

// Keystore entries come from all sorts of tooling, padded or not.
const STANDARD_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64url encode without padding
#[inline]
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64url decode a single segment
///
/// # Errors
/// `MalformedToken` when the segment is not canonical unpadded base64url
#[inline]
pub fn decode(segment: &str) -> JoseResult<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(segment)?)
}

/// Serialize a value to JSON and base64url encode it
///
/// # Errors
/// `Serialization` when the value cannot be rendered as JSON
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> JoseResult<String> {
    let json = serde_json::to_vec(value)?;
    Ok(encode(json))
}

/// Decode a segment holding a JSON object
///
/// # Errors
/// `MalformedToken` on bad base64url, bad JSON, or JSON that is not an object
pub fn decode_json_object(segment: &str) -> JoseResult<Map<String, Value>> {
    let bytes = decode(segment)?;
    json_object(&bytes)
}

/// Parse raw bytes as a JSON object
///
/// # Errors
/// `MalformedToken` when the bytes are not a JSON object
pub fn json_object(bytes: &[u8]) -> JoseResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JoseError::malformed("segment is not a JSON object")),
        Err(e) => Err(JoseError::malformed(format!("segment is not valid JSON: {e}"))),
    }
}

/// Join encoded segments into a compact token
#[must_use]
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let capacity = segments.iter().map(|s| s.as_ref().len() + 1).sum();
    let mut token = String::with_capacity(capacity);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            token.push(SEPARATOR);
        }
        token.push_str(segment.as_ref());
    }
    token
}

/// Split a compact token into its segments
///
/// # Errors
/// `MalformedToken` unless the token has exactly three or five non-empty segments
pub fn split(token: &str) -> JoseResult<Vec<&str>> {
    let segments: Vec<&str> = token.split(SEPARATOR).collect();
    if segments.len() != JWS_SEGMENTS && segments.len() != JWE_SEGMENTS {
        return Err(JoseError::malformed(format!(
            "expected {JWS_SEGMENTS} or {JWE_SEGMENTS} segments, got {}",
            segments.len()
        )));
    }
    if let Some(index) = segments.iter().position(|s| s.is_empty()) {
        return Err(JoseError::malformed(format!("segment {index} is empty")));
    }
    Ok(segments)
}

/// Decode standard-alphabet base64 with optional padding
pub(crate) fn decode_standard(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD_ANY_PADDING.decode(input.trim())
}
