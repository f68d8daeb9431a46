//! Codec Module
//!
//! UTF-8 JSON text at the byte boundary. No compression or framing.

use serde::{de::DeserializeOwned, Serialize};

/// JSON encoding of an absent value.
const ABSENT: &[u8] = b"null";

/// Encodes a value as UTF-8 JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}

/// Returns true if the encoded payload represents an absent value.
///
/// `None`, `()` and any shape that serialises to `null` count as absent.
pub fn is_absent(payload: &[u8]) -> bool {
    payload == ABSENT
}

/// Decodes UTF-8 JSON bytes into `T`.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct User {
        id: u32,
        name: String,
    }

    #[test]
    fn test_encode_is_plain_json_text() {
        let user = User {
            id: 42,
            name: "Ada".to_string(),
        };
        assert_eq!(encode(&user).unwrap(), br#"{"Id":42,"Name":"Ada"}"#.to_vec());
    }

    #[test]
    fn test_absent_detection() {
        assert!(is_absent(&encode(&None::<User>).unwrap()));
        assert!(is_absent(&encode(&()).unwrap()));
        assert!(!is_absent(&encode(&0u32).unwrap()));
        assert!(!is_absent(&encode("").unwrap()));
        assert!(!is_absent(&encode(&Vec::<u8>::new()).unwrap()));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(decode::<User>(br#"{"Id":"x"}"#).is_err());
        assert!(decode::<User>(b"\xff\xfe").is_err());
    }

    #[test]
    fn test_decode_unicode() {
        let value: String = decode("\"h\u{e9}llo \u{1f600}\"".as_bytes()).unwrap();
        assert_eq!(value, "h\u{e9}llo \u{1f600}");
    }
}
