//! Typed view over the checker's JSON result.
//!
//! The shape belongs to the Nu HTML Checker. Known fields are typed when the
//! service sent them with the expected JSON type; everything else, including
//! known keys with an unexpected type, is kept verbatim in the `extra` maps.
//! The only requirement on a reply is that it is a JSON object, and
//! serializing a result reproduces the object the service sent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of submitting one document to the checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
#[non_exhaustive]
pub struct ValidationResult {
    /// Document URL, present when the checker fetched the document itself.
    pub url: Option<String>,
    /// Diagnostics in the order the checker reported them.
    pub messages: Vec<Message>,
    /// Language the checker detected, if it reported one.
    pub language: Option<String>,
    /// Any further top-level keys (e.g. `source` with `showsource=yes`).
    pub extra: Map<String, Value>,
}

impl ValidationResult {
    /// Messages of type `error` or `non-document-error`.
    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_error())
    }

    /// `info` messages with the `warning` subtype.
    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_warning())
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// True when the checker reported no errors. Warnings and plain info
    /// messages do not affect validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }
}

impl From<Map<String, Value>> for ValidationResult {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            url: take(&mut map, "url"),
            messages: take(&mut map, "messages").unwrap_or_default(),
            language: take(&mut map, "language"),
            extra: map,
        }
    }
}

impl From<ValidationResult> for Map<String, Value> {
    fn from(result: ValidationResult) -> Self {
        let mut map = result.extra;
        put(&mut map, "url", result.url);
        // An absent or malformed `messages` key stays in `extra` untouched.
        if !map.contains_key("messages") {
            put(&mut map, "messages", Some(result.messages));
        }
        put(&mut map, "language", result.language);
        map
    }
}

/// Top-level category of a checker message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Info,
    Error,
    /// The checker could not process the document (I/O, schema, internal).
    NonDocumentError,
    /// A type this crate does not know about, kept as sent.
    Other(String),
}

impl MessageType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::NonDocumentError => "non-document-error",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for MessageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => Self::Info,
            "error" => Self::Error,
            "non-document-error" => Self::NonDocumentError,
            _ => Self::Other(s),
        }
    }
}

impl From<MessageType> for String {
    fn from(t: MessageType) -> Self {
        match t {
            MessageType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
///
/// Field names follow the service's camelCase keys (`subType`, `firstLine`,
/// `hiliteStart`, ...). Keys such as `offset` that are not modelled here live
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
#[non_exhaustive]
pub struct Message {
    /// `type`; `None` if the checker sent none.
    pub kind: Option<MessageType>,
    /// `warning` for info messages, `fatal`, `io`, `schema`, `internal` for errors.
    pub sub_type: Option<String>,
    pub message: Option<String>,
    /// Snippet of the source around the problem.
    pub extract: Option<String>,
    pub first_line: Option<u32>,
    pub last_line: Option<u32>,
    pub first_column: Option<u32>,
    pub last_column: Option<u32>,
    pub hilite_start: Option<u32>,
    pub hilite_length: Option<u32>,
    pub url: Option<String>,
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Message {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            kind: take::<String>(&mut map, "type").map(MessageType::from),
            sub_type: take(&mut map, "subType"),
            message: take(&mut map, "message"),
            extract: take(&mut map, "extract"),
            first_line: take(&mut map, "firstLine"),
            last_line: take(&mut map, "lastLine"),
            first_column: take(&mut map, "firstColumn"),
            last_column: take(&mut map, "lastColumn"),
            hilite_start: take(&mut map, "hiliteStart"),
            hilite_length: take(&mut map, "hiliteLength"),
            url: take(&mut map, "url"),
            extra: map,
        }
    }
}

impl From<Message> for Map<String, Value> {
    fn from(m: Message) -> Self {
        let mut map = m.extra;
        put(&mut map, "type", m.kind.map(String::from));
        put(&mut map, "subType", m.sub_type);
        put(&mut map, "message", m.message);
        put(&mut map, "extract", m.extract);
        put(&mut map, "firstLine", m.first_line);
        put(&mut map, "lastLine", m.last_line);
        put(&mut map, "firstColumn", m.first_column);
        put(&mut map, "lastColumn", m.last_column);
        put(&mut map, "hiliteStart", m.hilite_start);
        put(&mut map, "hiliteLength", m.hilite_length);
        put(&mut map, "url", m.url);
        map
    }
}

impl Message {
    /// Message text, empty if the checker sent none.
    #[must_use]
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            Some(MessageType::Error | MessageType::NonDocumentError)
        )
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.kind == Some(MessageType::Info) && self.sub_type.as_deref() == Some("warning")
    }

    /// Start of the reported range as `(line, column)`.
    ///
    /// The checker omits `firstLine` when the range sits on a single line, so
    /// `lastLine` stands in for it.
    #[must_use]
    pub fn location(&self) -> Option<(u32, u32)> {
        let line = self.first_line.or(self.last_line)?;
        let column = self.first_column.or(self.last_column).unwrap_or(0);
        Some((line, column))
    }

    /// `{line}:{column}: {type}[/{subType}]: {message}`, without the location
    /// prefix when the checker gave none.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        let kind = self.kind.as_ref().map_or("message", MessageType::as_str);
        let label = match &self.sub_type {
            Some(sub) => format!("{kind}/{sub}"),
            None => kind.to_owned(),
        };
        match self.location() {
            Some((line, column)) => format!("{line}:{column}: {label}: {}", self.text()),
            None => format!("{label}: {}", self.text()),
        }
    }
}

/// Remove `key` and decode it as `T`. A value of another shape is put back
/// so it is still serialized as received.
fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    match T::deserialize(&value) {
        Ok(typed) => Some(typed),
        Err(_) => {
            map.insert(key.to_owned(), value);
            None
        }
    }
}

fn put<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value
        && let Ok(json) = serde_json::to_value(value)
    {
        map.insert(key.to_owned(), json);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "messages": [
                {
                    "type": "error",
                    "lastLine": 3,
                    "lastColumn": 14,
                    "firstColumn": 7,
                    "message": "Element \u{201c}head\u{201d} is missing a required instance of child element \u{201c}title\u{201d}.",
                    "extract": "<head></head>",
                    "hiliteStart": 0,
                    "hiliteLength": 7
                },
                {
                    "type": "info",
                    "subType": "warning",
                    "lastLine": 1,
                    "lastColumn": 16,
                    "message": "Consider adding a \u{201c}lang\u{201d} attribute."
                },
                {
                    "type": "info",
                    "message": "Document checked."
                }
            ],
            "language": "en",
            "source": { "type": "text/html", "encoding": "utf-8" }
        })
    }

    #[test]
    fn test_counts_and_validity() {
        let result: ValidationResult = serde_json::from_value(sample()).unwrap();
        assert_eq!(result.messages.len(), 3);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
        assert!(!result.is_valid());
        assert_eq!(result.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_empty_messages_is_valid() {
        let result: ValidationResult = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.error_count(), 0);
    }

    #[test]
    fn test_sample_serializes_back_unchanged() {
        let result: ValidationResult = serde_json::from_value(sample()).unwrap();
        assert!(result.extra.contains_key("source"));
        assert_eq!(serde_json::to_value(&result).unwrap(), sample());
    }

    #[test]
    fn test_unmodelled_message_keys_survive() {
        let input = json!({
            "messages": [
                {"type": "error", "message": "x", "offset": 42, "lastLine": 1, "vendorNote": {"a": [1, 2]}}
            ]
        });
        let result: ValidationResult = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(result.messages[0].extra["offset"], 42);

        assert_eq!(serde_json::to_value(&result).unwrap(), input);
    }

    #[test]
    fn test_message_without_type_is_accepted() {
        let result: ValidationResult =
            serde_json::from_str(r#"{"messages": [{"message": "x"}]}"#).unwrap();
        let msg = &result.messages[0];
        assert!(msg.kind.is_none());
        assert!(!msg.is_error());
        assert_eq!(msg.format_human_readable(), "message: x");
        assert!(serde_json::to_value(msg).unwrap().get("type").is_none());
    }

    #[test]
    fn test_unexpected_field_types_are_kept_verbatim() {
        let input = json!({
            "url": 7,
            "messages": [
                {"type": "error", "message": "x", "lastLine": -1, "firstColumn": "3"}
            ]
        });
        let result: ValidationResult = serde_json::from_value(input.clone()).unwrap();
        let msg = &result.messages[0];
        assert!(msg.last_line.is_none());
        assert_eq!(msg.extra["lastLine"], -1);
        assert_eq!(result.extra["url"], 7);

        assert_eq!(serde_json::to_value(&result).unwrap(), input);
    }

    #[test]
    fn test_malformed_messages_stay_in_extra() {
        let input = json!({"messages": "none"});
        let result: ValidationResult = serde_json::from_value(input.clone()).unwrap();
        assert!(result.messages.is_empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), input);
    }

    #[test]
    fn test_unknown_message_type_is_kept() {
        let msg: Message =
            serde_json::from_str(r#"{"type": "advice", "message": "hm"}"#).unwrap();
        assert_eq!(msg.kind, Some(MessageType::Other("advice".to_owned())));
        assert!(!msg.is_error());
        assert_eq!(serde_json::to_value(&msg).unwrap()["type"], "advice");
    }

    #[test]
    fn test_non_document_error_counts_as_error() {
        let msg: Message = serde_json::from_str(
            r#"{"type": "non-document-error", "subType": "io", "message": "HTTP resource not retrievable."}"#,
        )
        .unwrap();
        assert!(msg.is_error());
        assert_eq!(
            msg.format_human_readable(),
            "non-document-error/io: HTTP resource not retrievable."
        );
    }

    #[test]
    fn test_location_falls_back_to_last_line() {
        let result: ValidationResult = serde_json::from_value(sample()).unwrap();
        let first = &result.messages[0];
        assert_eq!(first.location(), Some((3, 7)));
        assert!(first.format_human_readable().starts_with("3:7: error: Element"));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_str::<ValidationResult>("[]").is_err());
        assert!(serde_json::from_str::<ValidationResult>("\"ok\"").is_err());
    }
}
