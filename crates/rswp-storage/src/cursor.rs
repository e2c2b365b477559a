//! Opaque pagination cursors.
//!
//! A cursor is the URL-safe base64 encoding of the raw ordering-column value
//! of the last row a caller saw. Consumers must treat it as opaque; the
//! query builders decode it back into a strict inequality predicate.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

/// Encodes a raw ordering-column value into an opaque cursor.
pub fn encode_cursor(order_value: &str) -> String {
    URL_SAFE.encode(order_value.as_bytes())
}

/// Decodes a cursor back into the raw ordering-column value.
///
/// Returns `None` for malformed input (bad base64 or non-UTF-8 payload);
/// callers fall back to the first page rather than erroring.
pub fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = URL_SAFE.decode(cursor.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let encoded = encode_cursor("2024-05-01 12:30:00");
        assert_eq!(decode_cursor(&encoded).as_deref(), Some("2024-05-01 12:30:00"));
    }

    #[test]
    fn test_malformed_cursor_decodes_to_none() {
        assert_eq!(decode_cursor("!!not base64!!"), None);
    }

    #[test]
    fn test_empty_cursor_round_trips_to_empty() {
        assert_eq!(decode_cursor(&encode_cursor("")).as_deref(), Some(""));
    }
}
