use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Field name (wire spelling) to message, sorted for stable output
pub type FieldErrors = BTreeMap<String, String>;

/// Collects field errors while a request body is checked, then yields
/// either the accumulated errors or nothing.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Present, not blank, at most `max` characters
    pub fn required_text(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        match value {
            None => {
                self.add(field, "is required");
                None
            }
            Some(text) if text.trim().is_empty() => {
                self.add(field, "must not be blank");
                None
            }
            Some(text) => self.max_length(field, text, max),
        }
    }

    /// Absent is fine; present must fit in `max` characters
    pub fn optional_text(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        value.and_then(|text| self.max_length(field, text, max))
    }

    fn max_length(&mut self, field: &str, text: String, max: usize) -> Option<String> {
        if text.chars().count() > max {
            self.add(field, format!("must be at most {} characters", max));
            return None;
        }
        Some(text)
    }

    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "is required");
        }
        value
    }

    /// Inclusive lower bound on a decimal amount
    pub fn min_decimal(&mut self, field: &str, value: Decimal, min: Decimal) -> Option<Decimal> {
        if value < min {
            self.add(field, format!("must be greater than or equal to {}", min));
            return None;
        }
        Some(value)
    }

    /// Inclusive upper bound on a decimal amount
    pub fn max_decimal(&mut self, field: &str, value: Decimal, max: Decimal) -> Option<Decimal> {
        if value > max {
            self.add(field, format!("must be less than or equal to {}", max));
            return None;
        }
        Some(value)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
