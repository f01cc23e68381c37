//! Field-level checks shared by book payloads

use std::borrow::Cow;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use validator::ValidationError;

use crate::error::FieldErrors;

pub const ISBN_LENGTH: usize = 13;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_ISBN: &str = "ISBN must be exactly 13 digits.";
pub const MSG_DATE_FORMAT: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_INTEGER: &str = "A valid integer is required.";

/// Accepts exactly thirteen ASCII digits and hands the value back untouched.
pub fn validate_isbn(isbn: &str) -> Result<&str, ValidationError> {
    if isbn.chars().count() == ISBN_LENGTH && isbn.chars().all(|c| c.is_ascii_digit()) {
        Ok(isbn)
    } else {
        Err(ValidationError::new("isbn").with_message(Cow::Borrowed(MSG_ISBN)))
    }
}

/// Parse an ISO `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Pulls typed values out of a JSON object body.
///
/// A value of the wrong type is recorded against its field instead of
/// failing the whole body, so it is reported next to every other field error.
#[derive(Debug)]
pub struct FieldReader {
    fields: Map<String, Value>,
    errors: FieldErrors,
}

impl FieldReader {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            errors: FieldErrors::new(),
        }
    }

    /// `None` when absent, `Some(None)` when null or of the wrong type
    fn field<T>(
        &mut self,
        name: &str,
        convert: fn(Value) -> Result<T, &'static str>,
    ) -> Option<Option<T>> {
        match self.fields.remove(name)? {
            Value::Null => Some(None),
            value => match convert(value) {
                Ok(value) => Some(Some(value)),
                Err(message) => {
                    self.errors.add(name, message);
                    Some(None)
                }
            },
        }
    }

    pub fn string(&mut self, name: &str) -> Option<String> {
        self.field(name, as_string).flatten()
    }

    /// Distinguishes an explicit `null` from an absent field
    pub fn nullable_string(&mut self, name: &str) -> Option<Option<String>> {
        self.field(name, as_string)
    }

    pub fn integer(&mut self, name: &str) -> Option<i32> {
        self.field(name, as_integer).flatten()
    }

    pub fn nullable_integer(&mut self, name: &str) -> Option<Option<i32>> {
        self.field(name, as_integer)
    }

    /// Type errors collected so far
    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

fn as_string(value: Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(MSG_NOT_STRING),
    }
}

/// JSON integers and integer strings, within `i32`
fn as_integer(value: Value) -> Result<i32, &'static str> {
    let parsed = match &value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or(MSG_NOT_INTEGER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_isbn_is_returned_unchanged() {
        assert_eq!(validate_isbn("1234567890123").unwrap(), "1234567890123");
        assert_eq!(validate_isbn("0000000000000").unwrap(), "0000000000000");
    }

    #[test]
    fn test_invalid_isbn() {
        for isbn in [
            "",
            "invalidisbn",
            "123456789012",
            "12345678901234",
            "123456789012a",
            "978-0-00-0000",
            " 123456789012",
            "١٢٣٤٥٦٧٨٩٠١٢٣",
        ] {
            let err = validate_isbn(isbn).unwrap_err();
            assert_eq!(err.message.as_deref(), Some(MSG_ISBN), "{:?}", isbn);
        }
    }

    #[test]
    fn test_field_reader_records_type_errors() {
        let body = serde_json::json!({
            "title": 42,
            "author": "Someone",
            "pages": "abc",
            "cover": null,
        });
        let Value::Object(fields) = body else {
            unreachable!()
        };

        let mut reader = FieldReader::new(fields);
        assert_eq!(reader.string("title"), None);
        assert_eq!(reader.string("author").as_deref(), Some("Someone"));
        assert_eq!(reader.integer("pages"), None);
        assert_eq!(reader.nullable_string("cover"), Some(None));
        assert_eq!(reader.nullable_string("language"), None);

        let errors = reader.finish();
        assert_eq!(errors.get("title"), Some(&[MSG_NOT_STRING.to_string()][..]));
        assert_eq!(errors.get("pages"), Some(&[MSG_NOT_INTEGER.to_string()][..]));
        assert!(!errors.contains("author"));
        assert!(!errors.contains("cover"));
    }

    #[test]
    fn test_integer_accepts_numeric_strings() {
        let Value::Object(fields) = serde_json::json!({"a": "200", "b": 3_000_000_000_i64, "c": 1.5})
        else {
            unreachable!()
        };
        let mut reader = FieldReader::new(fields);
        assert_eq!(reader.integer("a"), Some(200));
        assert_eq!(reader.integer("b"), None);
        assert_eq!(reader.integer("c"), None);
        let errors = reader.finish();
        assert!(errors.contains("b"));
        assert!(errors.contains("c"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-01-01"), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("01/01/2023"), None);
    }
}
