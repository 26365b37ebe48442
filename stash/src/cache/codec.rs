//! JSON encoding of cached values.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored entry is not valid JSON for the requested type: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored entry is not valid UTF-8")]
    NotUtf8,
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(value).map(Bytes::from)
}

pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Decode the stored bytes as if they were a JSON string holding the raw text.
///
/// Succeeds for targets that accept a string (`String`, `serde_json::Value`,
/// string-backed newtypes); anything structured still fails.
pub fn decode_raw<T: DeserializeOwned>(raw: &[u8]) -> Result<T, DecodeError> {
    let text = std::str::from_utf8(raw).map_err(|_| DecodeError::NotUtf8)?;
    Ok(serde_json::from_value(serde_json::Value::String(
        text.to_owned(),
    ))?)
}
