//! Validators for the nested records of a candidate payload.
//!
//! Each one walks its fields in a fixed order and returns the first violation unchanged.

use serde_json::Value;

use super::fields::{validate_date, validate_text, TextRule};
use super::{FieldCategory, Requirement, ValidationError, ValidationResult};

pub const FILE_PATH_KEY: &str = "filePath";
pub const FILE_TYPE_KEY: &str = "fileType";

/// institution → title → startDate → endDate.
pub fn validate_education(entry: &Value) -> ValidationResult {
    validate_text(entry.get("institution"), TextRule::INSTITUTION)?;
    validate_text(entry.get("title"), TextRule::TITLE)?;
    validate_date(entry.get("startDate"), Requirement::Required)?;
    validate_date(entry.get("endDate"), Requirement::Optional)
}

/// company → position → description → startDate → endDate.
pub fn validate_work_experience(entry: &Value) -> ValidationResult {
    validate_text(entry.get("company"), TextRule::COMPANY)?;
    validate_text(entry.get("position"), TextRule::POSITION)?;
    validate_text(entry.get("description"), TextRule::DESCRIPTION)?;
    validate_date(entry.get("startDate"), Requirement::Required)?;
    validate_date(entry.get("endDate"), Requirement::Optional)
}

/// Accepts no CV, an object with neither file key, or an object with both keys as strings.
pub fn validate_cv(cv: Option<&Value>) -> ValidationResult {
    let object = match cv {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(object)) => object,
        Some(_) => return Err(ValidationError::new(FieldCategory::Cv)),
    };

    match (object.get(FILE_PATH_KEY), object.get(FILE_TYPE_KEY)) {
        (None, None) => Ok(()),
        (Some(Value::String(_)), Some(Value::String(_))) => Ok(()),
        _ => Err(ValidationError::new(FieldCategory::Cv)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn education() -> Value {
        json!({
            "institution": "Universidad Complutense",
            "title": "Ingeniería Informática",
            "startDate": "2010-09-01",
            "endDate": "2014-06-30"
        })
    }

    fn work_experience() -> Value {
        json!({
            "company": "Acme",
            "position": "Backend engineer",
            "description": "Payments platform",
            "startDate": "2015-01-01"
        })
    }

    #[test]
    fn complete_records_pass() {
        assert!(validate_education(&education()).is_ok());
        assert!(validate_work_experience(&work_experience()).is_ok());
    }

    #[test]
    fn education_reports_first_failing_field() {
        let mut entry = education();
        entry["title"] = json!("");
        entry["startDate"] = json!("2010/09/01");
        let err = validate_education(&entry).expect_err("title checked before date");
        assert_eq!(err.category(), FieldCategory::Title);

        let mut entry = education();
        entry["institution"] = json!(null);
        entry["title"] = json!("");
        let err = validate_education(&entry).expect_err("institution checked first");
        assert_eq!(err.to_string(), "Invalid institution");
    }

    #[test]
    fn education_end_date_is_optional_but_shaped() {
        let mut entry = education();
        entry.as_object_mut().expect("object").remove("endDate");
        assert!(validate_education(&entry).is_ok());

        entry["endDate"] = json!("June 2014");
        let err = validate_education(&entry).expect_err("bad end date");
        assert_eq!(err.to_string(), "Invalid end date");
    }

    #[test]
    fn work_experience_checks_description_before_dates() {
        let mut entry = work_experience();
        entry["description"] = json!("x".repeat(201));
        entry["startDate"] = json!("nope");
        let err = validate_work_experience(&entry).expect_err("description too long");
        assert_eq!(err.category(), FieldCategory::Description);

        let mut entry = work_experience();
        entry["startDate"] = json!("2015-1-1");
        let err = validate_work_experience(&entry).expect_err("short date");
        assert_eq!(err.to_string(), "Invalid date");
    }

    #[test]
    fn cv_accepts_empty_or_complete_objects() {
        assert!(validate_cv(None).is_ok());
        assert!(validate_cv(Some(&json!({}))).is_ok());
        assert!(validate_cv(Some(&json!({
            "filePath": "uploads/cv.pdf",
            "fileType": "application/pdf"
        })))
        .is_ok());
    }

    #[test]
    fn cv_rejects_partial_or_mistyped_objects() {
        for cv in [
            json!({ "filePath": "x" }),
            json!({ "fileType": "application/pdf" }),
            json!({ "filePath": 123, "fileType": "application/pdf" }),
            json!("uploads/cv.pdf"),
            json!([]),
        ] {
            let err = validate_cv(Some(&cv)).expect_err("invalid cv");
            assert_eq!(err.to_string(), "Invalid CV data", "{cv}");
        }
    }
}
