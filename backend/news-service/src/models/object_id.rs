//! Conversion between the store's native `ObjectId` and its textual form.

use mongodb::bson::oid::ObjectId;
use std::fmt;

/// Raised when a textual identifier is not a 24-character hex `ObjectId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNewsId(pub String);

impl fmt::Display for InvalidNewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid news id '{}'", self.0)
    }
}

impl std::error::Error for InvalidNewsId {}

/// Parse an identifier taken from a URL path.
pub fn parse_news_id(raw: &str) -> Result<ObjectId, InvalidNewsId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| InvalidNewsId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_identifier() {
        let id = ObjectId::new();
        assert_eq!(parse_news_id(&id.to_hex()), Ok(id));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let id = ObjectId::new();
        assert_eq!(parse_news_id(&format!(" {} ", id.to_hex())), Ok(id));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for raw in ["", "unknown", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "507f1f77bcf86cd79943901"] {
            assert_eq!(parse_news_id(raw), Err(InvalidNewsId(raw.to_string())));
        }
    }

    #[test]
    fn error_keeps_raw_text() {
        let err = parse_news_id("nope").unwrap_err();
        assert_eq!(err.to_string(), "invalid news id 'nope'");
    }
}
