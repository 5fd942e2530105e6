//! Stateless checks for individual scalar fields.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{is_blank, FieldCategory, Requirement, ValidationError, ValidationResult};
use crate::config::IntakeConfig;

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 100;
const ADDRESS_MAX_LEN: usize = 100;
const PHONE_LEN: usize = 9;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-ZñÑáéíóúÁÉÍÓÚ ]+$").expect("name pattern compiles")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._+\-]+@([A-Za-z0-9\-]+\.)+[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles")
    })
}

/// Leading digits accepted for mobile phone numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonePolicy {
    leading_digits: Vec<char>,
}

impl PhonePolicy {
    /// Non-digit entries are discarded. An empty set falls back to the default `{6, 7, 9}`.
    pub fn new(leading_digits: impl IntoIterator<Item = char>) -> Self {
        let mut digits: Vec<char> = leading_digits
            .into_iter()
            .filter(char::is_ascii_digit)
            .collect();
        digits.sort_unstable();
        digits.dedup();

        if digits.is_empty() {
            return Self::default();
        }

        Self {
            leading_digits: digits,
        }
    }

    pub fn leading_digits(&self) -> &[char] {
        &self.leading_digits
    }

    pub fn accepts(&self, phone: &str) -> bool {
        phone.len() == PHONE_LEN
            && phone.chars().all(|c| c.is_ascii_digit())
            && phone
                .chars()
                .next()
                .is_some_and(|first| self.leading_digits.contains(&first))
    }
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self {
            leading_digits: vec!['6', '7', '9'],
        }
    }
}

impl From<&IntakeConfig> for PhonePolicy {
    fn from(config: &IntakeConfig) -> Self {
        Self::new(config.phone_leading_digits.iter().copied())
    }
}

/// Length and presence constraints for a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub category: FieldCategory,
    pub requirement: Requirement,
    pub max_len: usize,
}

impl TextRule {
    pub const INSTITUTION: Self = Self::required(FieldCategory::Institution, 100);
    pub const TITLE: Self = Self::required(FieldCategory::Title, 100);
    pub const COMPANY: Self = Self::required(FieldCategory::Company, 100);
    pub const POSITION: Self = Self::required(FieldCategory::Position, 100);
    pub const DESCRIPTION: Self = Self::optional(FieldCategory::Description, 200);

    pub const fn required(category: FieldCategory, max_len: usize) -> Self {
        Self {
            category,
            requirement: Requirement::Required,
            max_len,
        }
    }

    pub const fn optional(category: FieldCategory, max_len: usize) -> Self {
        Self {
            category,
            requirement: Requirement::Optional,
            max_len,
        }
    }
}

/// First or last name: letters (Spanish accented vowels and ñ included) and spaces, 2..=100 chars.
///
/// Surrounding whitespace counts towards the length and is not rejected.
pub fn validate_name(value: Option<&Value>) -> ValidationResult {
    let Some(Value::String(name)) = value else {
        return Err(ValidationError::new(FieldCategory::Name));
    };

    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) || !name_pattern().is_match(name) {
        return Err(ValidationError::new(FieldCategory::Name));
    }

    Ok(())
}

pub fn validate_email(value: Option<&Value>) -> ValidationResult {
    match value {
        Some(Value::String(email)) if email_pattern().is_match(email) => Ok(()),
        _ => Err(ValidationError::new(FieldCategory::Email)),
    }
}

/// Optional nine-digit mobile number whose first digit is allowed by `policy`.
pub fn validate_phone(value: Option<&Value>, policy: &PhonePolicy) -> ValidationResult {
    if is_blank(value) {
        return Ok(());
    }

    match value {
        Some(Value::String(phone)) if policy.accepts(phone) => Ok(()),
        _ => Err(ValidationError::new(FieldCategory::Phone)),
    }
}

pub fn validate_address(value: Option<&Value>) -> ValidationResult {
    if is_blank(value) {
        return Ok(());
    }

    match value {
        Some(Value::String(address)) if address.chars().count() <= ADDRESS_MAX_LEN => Ok(()),
        _ => Err(ValidationError::new(FieldCategory::Address)),
    }
}

pub fn validate_text(value: Option<&Value>, rule: TextRule) -> ValidationResult {
    if rule.requirement == Requirement::Optional && is_blank(value) {
        return Ok(());
    }

    match value {
        Some(Value::String(text)) if !text.is_empty() && text.chars().count() <= rule.max_len => {
            Ok(())
        }
        _ => Err(ValidationError::new(rule.category)),
    }
}

/// Shape-only `YYYY-MM-DD` check; calendar validity is not enforced.
///
/// Start dates are required and report [`FieldCategory::Date`]; end dates may be omitted and
/// report [`FieldCategory::EndDate`].
pub fn validate_date(value: Option<&Value>, requirement: Requirement) -> ValidationResult {
    let category = match requirement {
        Requirement::Required => FieldCategory::Date,
        Requirement::Optional => FieldCategory::EndDate,
    };

    if requirement == Requirement::Optional && is_blank(value) {
        return Ok(());
    }

    match value {
        Some(Value::String(date)) if date_pattern().is_match(date) => Ok(()),
        _ => Err(ValidationError::new(category)),
    }
}
