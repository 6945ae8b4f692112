//! Field-level validation for message submissions.
//!
//! Static rules (required, length) are declared on
//! [`CreateMessageRequest`](crate::schemas::message::CreateMessageRequest) and
//! evaluated with the `validator` crate. The uniqueness rule needs the store
//! and is applied by the service afterwards. Every field reports into a
//! [`FieldErrors`] map instead of returning early, so the caller sees all
//! offending fields at once; within one field only the first failing rule in
//! [`RULE_ORDER`] is kept.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const NAME_LENGTH: &str = "Name must be between 1 and 10 characters long.";
pub const TEXT_LENGTH: &str = "Text must be between 10 and 1000 characters long.";
pub const NAME_TAKEN: &str = "Name already exists.";

/// Error code raised by [`not_blank`].
pub const BLANK: &str = "blank";

/// Static rule codes in evaluation order. Codes not listed rank last.
pub const RULE_ORDER: [&str; 3] = ["required", BLANK, "length"];

/// Present but empty or whitespace-only values count as missing.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(BLANK).with_message(Cow::Borrowed(REQUIRED)))
    } else {
        Ok(())
    }
}

fn rule_rank(code: &str) -> usize {
    RULE_ORDER
        .iter()
        .position(|c| *c == code)
        .unwrap_or(RULE_ORDER.len())
}

/// Field name → ordered list of human-readable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the offending fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let Some(first) = errs.iter().min_by_key(|e| rule_rank(&e.code)) else {
                continue;
            };
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            out.add(field.to_string(), message);
        }
        out
    }
}

/// Run the declared static rules of `input`.
pub fn check<T: Validate>(input: &T) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}
