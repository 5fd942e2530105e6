//! Acceptance rules for raw candidate payloads.
//!
//! Validators read `serde_json::Value`s straight from the request body so that wrong-typed
//! input (a number where a name belongs, an object in place of the education list) is
//! rejected with the same category-prefixed message as any other violation. Callers match on
//! the message prefix, so the prefixes in [`FieldCategory::prefix`] are part of the external
//! contract.

mod candidate;
pub mod fields;
pub mod records;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

pub use candidate::CandidateValidator;
pub use fields::{PhonePolicy, TextRule};

/// Field family a validation failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Name,
    Email,
    Phone,
    Address,
    Institution,
    Title,
    Company,
    Position,
    Description,
    Date,
    EndDate,
    Cv,
    Payload,
}

impl FieldCategory {
    pub const fn prefix(self) -> &'static str {
        match self {
            FieldCategory::Name => "Invalid name",
            FieldCategory::Email => "Invalid email",
            FieldCategory::Phone => "Invalid phone",
            FieldCategory::Address => "Invalid address",
            FieldCategory::Institution => "Invalid institution",
            FieldCategory::Title => "Invalid title",
            FieldCategory::Company => "Invalid company",
            FieldCategory::Position => "Invalid position",
            FieldCategory::Description => "Invalid description",
            FieldCategory::Date => "Invalid date",
            FieldCategory::EndDate => "Invalid end date",
            FieldCategory::Cv => "Invalid CV data",
            FieldCategory::Payload => "Invalid candidate data",
        }
    }
}

/// Whether an absent or empty value is acceptable for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// First rule violation found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    category: FieldCategory,
    message: String,
}

impl ValidationError {
    pub fn new(category: FieldCategory) -> Self {
        Self {
            category,
            message: category.prefix().to_string(),
        }
    }

    pub fn with_detail(category: FieldCategory, detail: impl fmt::Display) -> Self {
        Self {
            category,
            message: format!("{}: {}", category.prefix(), detail),
        }
    }

    pub fn category(&self) -> FieldCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy, everything else is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Absent, `null` and `""` all mean "not supplied" for optional fields.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}
