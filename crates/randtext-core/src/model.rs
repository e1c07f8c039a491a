//! Text record model and provider payload parsing.

use serde::{Deserialize, Serialize};

/// Errors produced while turning a raw provider payload into a record.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Payload missing field: {0}")]
    MissingField(&'static str),

    #[error("Payload field '{field}' has wrong type: {message}")]
    WrongType { field: &'static str, message: String },
}

/// Random text as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomText {
    /// The generated text.
    pub value: String,
    /// Length reported by the provider.
    pub length: i64,
    /// Creation timestamp reported by the provider.
    pub created: String,
}

/// Top-level provider payload: `{"randomText": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomTextResponse {
    #[serde(rename = "randomText")]
    pub random_text: RandomText,
}

impl RandomTextResponse {
    /// Wrap a payload.
    pub fn new(random_text: RandomText) -> Self {
        Self { random_text }
    }

    /// Parse a JSON payload, reporting which field is absent or mistyped.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let root: serde_json::Value =
            serde_json::from_str(json).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

        let inner = root
            .get("randomText")
            .ok_or(PayloadError::MissingField("randomText"))?;
        if !inner.is_object() {
            return Err(PayloadError::WrongType {
                field: "randomText",
                message: "expected an object".to_string(),
            });
        }

        let value = text_field(inner, "value")?;
        let created = text_field(inner, "created")?;
        let length = inner
            .get("length")
            .ok_or(PayloadError::MissingField("length"))?
            .as_i64()
            .ok_or_else(|| PayloadError::WrongType {
                field: "length",
                message: "expected an integer".to_string(),
            })?;

        Ok(Self::new(RandomText {
            value,
            length,
            created,
        }))
    }

    /// Serialize to the provider wire format.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "randomText": {
                "value": self.random_text.value,
                "length": self.random_text.length,
                "created": self.random_text.created,
            }
        })
        .to_string()
    }
}

fn text_field(obj: &serde_json::Value, field: &'static str) -> Result<String, PayloadError> {
    obj.get(field)
        .ok_or(PayloadError::MissingField(field))?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PayloadError::WrongType {
            field,
            message: "expected a string".to_string(),
        })
}

/// A validated record that has not been assigned an id yet.
///
/// `length` always equals the character count of `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTextRecord {
    value: String,
    length: i64,
    created: String,
}

impl NewTextRecord {
    /// Create a record, deriving its length from the value.
    pub fn new(value: impl Into<String>, created: impl Into<String>) -> Self {
        let value = value.into();
        let length = value.chars().count() as i64;
        Self {
            value,
            length,
            created: created.into(),
        }
    }

    /// Derive a record from a provider payload.
    ///
    /// The provider's reported length is discarded; use
    /// [`RandomText::length_matches`] to detect a disagreement first.
    pub fn from_payload(payload: RandomText) -> Self {
        Self::new(payload.value, payload.created)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn created(&self) -> &str {
        &self.created
    }
}

impl RandomText {
    /// Whether the reported length equals the character count of the value.
    pub fn length_matches(&self) -> bool {
        self.value.chars().count() as i64 == self.length
    }
}

/// A persisted text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Store-generated identifier.
    pub id: i64,
    /// The text.
    pub value: String,
    /// Character count of `value`.
    pub length: i64,
    /// Creation timestamp as delivered by the provider.
    pub created: String,
}

impl TextRecord {
    /// Attach a store-generated id to a validated record.
    pub fn from_new(id: i64, record: NewTextRecord) -> Self {
        Self {
            id,
            value: record.value,
            length: record.length,
            created: record.created,
        }
    }
}

impl std::fmt::Display for TextRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({} chars, {})", self.id, self.value, self.length, self.created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        r#"{"randomText":{"value":"abc123","length":6,"created":"2024-05-01T10:00:00Z"}}"#;

    #[test]
    fn test_parse_payload() {
        let response = RandomTextResponse::from_json(SAMPLE).unwrap();
        assert_eq!(response.random_text.value, "abc123");
        assert_eq!(response.random_text.length, 6);
        assert_eq!(response.random_text.created, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_parse_missing_wrapper() {
        let err = RandomTextResponse::from_json(r#"{"value":"abc"}"#).unwrap_err();
        assert!(matches!(err, PayloadError::MissingField("randomText")));
    }

    #[test]
    fn test_parse_missing_inner_field() {
        let err = RandomTextResponse::from_json(r#"{"randomText":{"value":"abc","length":3}}"#)
            .unwrap_err();
        assert!(matches!(err, PayloadError::MissingField("created")));
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = RandomTextResponse::from_json(
            r#"{"randomText":{"value":"abc","length":"3","created":"now"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PayloadError::WrongType { field: "length", .. }));
    }

    #[test]
    fn test_parse_not_json() {
        let err = RandomTextResponse::from_json("not json").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidJson(_)));
    }

    #[test]
    fn test_to_json_parses_back() {
        let response = RandomTextResponse::from_json(SAMPLE).unwrap();
        let again = RandomTextResponse::from_json(&response.to_json()).unwrap();
        assert_eq!(response, again);
    }

    #[test]
    fn test_new_record_derives_length() {
        let record = NewTextRecord::new("abc123", "now");
        assert_eq!(record.length(), 6);
    }

    #[test]
    fn test_new_record_counts_chars_not_bytes() {
        let record = NewTextRecord::new("héllo", "now");
        assert_eq!(record.length(), 5);
    }

    #[test]
    fn test_from_payload_recomputes_length() {
        let payload = RandomText {
            value: "abcd".to_string(),
            length: 99,
            created: "now".to_string(),
        };
        assert!(!payload.length_matches());

        let record = NewTextRecord::from_payload(payload);
        assert_eq!(record.length(), 4);
        assert_eq!(record.value(), "abcd");
    }

    #[test]
    fn test_text_record_from_new() {
        let record = TextRecord::from_new(7, NewTextRecord::new("xyz", "t0"));
        assert_eq!(record.id, 7);
        assert_eq!(record.length, 3);
        assert_eq!(record.created, "t0");
    }
}
