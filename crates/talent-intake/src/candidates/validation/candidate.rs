use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{validate_address, validate_email, validate_name, validate_phone, PhonePolicy};
use super::records::{validate_cv, validate_education, validate_work_experience};
use super::{is_truthy, FieldCategory, ValidationError, ValidationResult};
use crate::candidates::request::{CandidateRequest, ID_KEY};
use crate::config::IntakeConfig;

/// Top-level payload validator. Stops at the first violation.
#[derive(Debug, Clone, Default)]
pub struct CandidateValidator {
    phone: PhonePolicy,
}

impl CandidateValidator {
    pub fn new(phone: PhonePolicy) -> Self {
        Self { phone }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(PhonePolicy::from(config))
    }

    pub fn phone_policy(&self) -> &PhonePolicy {
        &self.phone
    }

    /// Validate a raw payload.
    ///
    /// Payloads carrying a truthy `id` are edit requests from a trusted caller and are accepted
    /// without looking at any other field.
    pub fn validate(&self, payload: &Value) -> ValidationResult {
        let Value::Object(fields) = payload else {
            return Err(ValidationError::with_detail(
                FieldCategory::Payload,
                "expected a JSON object",
            ));
        };

        if fields.get(ID_KEY).is_some_and(is_truthy) {
            debug!("edit payload, skipping field validation");
            return Ok(());
        }

        self.validate_fields(fields)
    }

    /// Validate an already classified request. Updates are never field-checked.
    pub fn validate_request(&self, request: &CandidateRequest) -> ValidationResult {
        match request {
            CandidateRequest::Create(fields) => self.validate_fields(fields),
            CandidateRequest::Update { .. } => Ok(()),
        }
    }

    fn validate_fields(&self, fields: &Map<String, Value>) -> ValidationResult {
        validate_name(fields.get("firstName"))?;
        validate_name(fields.get("lastName"))?;
        validate_email(fields.get("email"))?;
        validate_phone(fields.get("phone"), &self.phone)?;
        validate_address(fields.get("address"))?;
        validate_entries(fields, "educations", validate_education)?;
        validate_entries(fields, "workExperiences", validate_work_experience)?;
        validate_cv(fields.get("cv"))
    }
}

/// The collection must be an array before any entry is looked at.
fn validate_entries(
    fields: &Map<String, Value>,
    key: &str,
    validate_entry: fn(&Value) -> ValidationResult,
) -> ValidationResult {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(entries)) => entries.iter().try_for_each(validate_entry),
        Some(_) => Err(ValidationError::with_detail(
            FieldCategory::Payload,
            format_args!("{key} must be an array"),
        )),
    }
}
