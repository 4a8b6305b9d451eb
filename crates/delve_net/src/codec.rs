//! JSON codec helpers.
//!
//! Thin wrappers around `serde_json` for encoding outbound frames and
//! decoding inbound messages. The browser client speaks JSON text frames.

use serde::{Deserialize, Serialize};

use crate::error::NetError;

/// Encode a value to a JSON string.
///
/// # Errors
///
/// Returns [`NetError::Encode`] if serialisation fails.
pub fn encode<T: Serialize>(value: &T) -> Result<String, NetError> {
    serde_json::to_string(value).map_err(NetError::Encode)
}

/// Decode a value from JSON text.
///
/// # Errors
///
/// Returns [`NetError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, NetError> {
    serde_json::from_str(text).map_err(NetError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct TestMsg {
        value: u32,
        name: String,
    }

    #[test]
    fn test_encode_is_compact_json() {
        let msg = TestMsg {
            value: 42,
            name: "hello".to_string(),
        };
        assert_eq!(encode(&msg).unwrap(), r#"{"value":42,"name":"hello"}"#);
    }

    #[test]
    fn test_decode_invalid_text() {
        let result: Result<TestMsg, _> = decode("{not json");
        assert!(matches!(result, Err(NetError::Decode(_))));
    }
}
