pub mod account;
pub mod listing;

use std::collections::BTreeMap;

use serde::Serialize;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    /// `Ok(value)` when no error was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

pub(crate) const REQUIRED: &str = "This field is required.";

/// Records a required-field error for blank input and returns the trimmed value.
pub(crate) fn require<'a>(errors: &mut FormErrors, field: &str, value: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    }
    trimmed
}

pub(crate) fn max_chars(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reports_collected_errors() {
        let mut errors = FormErrors::new();
        errors.add("title", "bad");
        errors.add("title", "worse");
        let err = errors.finish(()).unwrap_err();
        assert_eq!(err.get("title").unwrap().len(), 2);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut errors = FormErrors::new();
        errors.add("email", REQUIRED);
        let v = serde_json::to_value(&errors).unwrap();
        assert_eq!(v, serde_json::json!({"email": [REQUIRED]}));
    }
}
