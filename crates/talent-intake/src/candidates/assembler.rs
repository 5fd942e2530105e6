use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::domain::{Candidate, CandidateId, Education, Resume, WorkExperience};
use super::request::CandidateRequest;
use super::validation::{FieldCategory, ValidationError};

/// Builds the in-memory aggregate from a request. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateAssembler;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CandidateDraft {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    educations: Option<Vec<EducationDraft>>,
    work_experiences: Option<Vec<WorkExperienceDraft>>,
    cv: Option<CvDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EducationDraft {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    institution: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkExperienceDraft {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    company: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CvDraft {
    file_path: Option<String>,
    file_type: Option<String>,
}

impl CandidateAssembler {
    /// Assemble a candidate from `request`, stamping any CV reference with `upload_date`.
    ///
    /// Absent collections become empty vectors. Only trusted update payloads can reach the
    /// error path, since create payloads have already been shape-checked.
    pub fn assemble(
        &self,
        request: &CandidateRequest,
        upload_date: DateTime<Utc>,
    ) -> Result<Candidate, ValidationError> {
        build(request.fields().clone(), request.id(), upload_date)
    }

    /// Overlay an edit onto the stored candidate row.
    ///
    /// Scalar keys missing from the request keep their stored value; an explicit `null` or `""`
    /// clears `phone` and `address`. Nested collections come from the request only, so rows
    /// already owned by the candidate are left untouched.
    pub fn patch(
        &self,
        stored: &Candidate,
        request: &CandidateRequest,
        upload_date: DateTime<Utc>,
    ) -> Result<Candidate, ValidationError> {
        let mut fields = stored_scalars(stored);
        fields.extend(
            request
                .fields()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        build(fields, request.id().or(stored.id), upload_date)
    }
}

fn stored_scalars(stored: &Candidate) -> Map<String, Value> {
    let optional = |value: &Option<String>| value.clone().map_or(Value::Null, Value::String);

    let mut fields = Map::new();
    fields.insert("firstName".into(), Value::String(stored.first_name.clone()));
    fields.insert("lastName".into(), Value::String(stored.last_name.clone()));
    fields.insert("email".into(), Value::String(stored.email.clone()));
    fields.insert("phone".into(), optional(&stored.phone));
    fields.insert("address".into(), optional(&stored.address));
    fields
}

fn build(
    fields: Map<String, Value>,
    id: Option<CandidateId>,
    upload_date: DateTime<Utc>,
) -> Result<Candidate, ValidationError> {
    let draft: CandidateDraft = serde_json::from_value(Value::Object(fields))
        .map_err(|err| ValidationError::with_detail(FieldCategory::Payload, err))?;

    let educations = draft
        .educations
        .unwrap_or_default()
        .into_iter()
        .map(|entry| Education {
            id: entry.id,
            candidate_id: id,
            institution: entry.institution,
            title: entry.title,
            start_date: entry.start_date,
            end_date: non_empty(entry.end_date),
        })
        .collect();

    let work_experiences = draft
        .work_experiences
        .unwrap_or_default()
        .into_iter()
        .map(|entry| WorkExperience {
            id: entry.id,
            candidate_id: id,
            company: entry.company,
            position: entry.position,
            description: non_empty(entry.description),
            start_date: entry.start_date,
            end_date: non_empty(entry.end_date),
        })
        .collect();

    let resumes = match draft.cv {
        Some(CvDraft {
            file_path: Some(file_path),
            file_type: Some(file_type),
        }) => vec![Resume {
            id: None,
            candidate_id: id,
            file_path,
            file_type,
            upload_date,
        }],
        _ => Vec::new(),
    };

    Ok(Candidate {
        id,
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        phone: non_empty(draft.phone),
        address: non_empty(draft.address),
        educations,
        work_experiences,
        resumes,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn upload_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn assemble(payload: Value) -> Result<Candidate, ValidationError> {
        let request = CandidateRequest::from_payload(payload).expect("object payload");
        CandidateAssembler.assemble(&request, upload_date())
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let candidate = assemble(json!({
            "firstName": "Jo",
            "lastName": "González",
            "email": "jose@example.com"
        }))
        .expect("assembles");

        assert!(candidate.educations.is_empty());
        assert!(candidate.work_experiences.is_empty());
        assert!(candidate.resumes.is_empty());
        assert_eq!(candidate.id, None);
        assert_eq!(candidate.phone, None);
    }

    #[test]
    fn nested_records_and_cv_are_copied() {
        let candidate = assemble(json!({
            "firstName": "Ana",
            "lastName": "López",
            "email": "ana@example.com",
            "phone": "612345678",
            "address": "Calle Mayor 1",
            "educations": [{
                "institution": "UPM",
                "title": "Teleco",
                "startDate": "2010-09-01",
                "endDate": ""
            }],
            "workExperiences": [{
                "company": "Acme",
                "position": "Engineer",
                "startDate": "2015-01-01",
                "endDate": "2019-12-31"
            }],
            "cv": { "filePath": "uploads/ana.pdf", "fileType": "application/pdf" }
        }))
        .expect("assembles");

        assert_eq!(candidate.phone.as_deref(), Some("612345678"));
        assert_eq!(candidate.educations.len(), 1);
        assert_eq!(candidate.educations[0].end_date, None);
        assert_eq!(candidate.work_experiences[0].description, None);
        assert_eq!(
            candidate.work_experiences[0].end_date.as_deref(),
            Some("2019-12-31")
        );
        assert_eq!(candidate.resumes.len(), 1);
        assert_eq!(candidate.resumes[0].file_path, "uploads/ana.pdf");
        assert_eq!(candidate.resumes[0].upload_date, upload_date());
    }

    #[test]
    fn empty_cv_object_yields_no_resume() {
        let candidate = assemble(json!({
            "firstName": "Ana",
            "lastName": "López",
            "email": "ana@example.com",
            "cv": {}
        }))
        .expect("assembles");
        assert!(candidate.resumes.is_empty());
    }

    #[test]
    fn update_requests_carry_identifier_into_children() {
        let candidate = assemble(json!({
            "id": 9,
            "firstName": "Ana",
            "educations": [{ "institution": "UPM", "title": "Teleco", "startDate": "2010-09-01" }]
        }))
        .expect("assembles partial update");

        assert_eq!(candidate.id, Some(CandidateId(9)));
        assert_eq!(candidate.educations[0].candidate_id, Some(CandidateId(9)));
    }

    fn stored_row() -> Candidate {
        Candidate {
            id: Some(CandidateId(9)),
            first_name: "Jo".to_string(),
            last_name: "González".to_string(),
            email: "jose@example.com".to_string(),
            phone: Some("612345678".to_string()),
            address: Some("Calle Mayor 1".to_string()),
            educations: Vec::new(),
            work_experiences: Vec::new(),
            resumes: Vec::new(),
        }
    }

    #[test]
    fn patch_keeps_fields_the_edit_leaves_out() {
        let request = CandidateRequest::from_payload(json!({ "id": 9, "firstName": "Ana" }))
            .expect("update request");

        let patched = CandidateAssembler
            .patch(&stored_row(), &request, upload_date())
            .expect("patches");

        assert_eq!(patched.first_name, "Ana");
        assert_eq!(patched.last_name, "González");
        assert_eq!(patched.email, "jose@example.com");
        assert_eq!(patched.phone.as_deref(), Some("612345678"));
        assert_eq!(patched.address.as_deref(), Some("Calle Mayor 1"));
        assert!(patched.educations.is_empty());
    }

    #[test]
    fn patch_clears_optional_fields_sent_empty() {
        let request = CandidateRequest::from_payload(json!({
            "id": 9,
            "phone": null,
            "address": "",
            "workExperiences": [{
                "company": "Acme",
                "position": "Analyst",
                "startDate": "2019-02-01"
            }]
        }))
        .expect("update request");

        let patched = CandidateAssembler
            .patch(&stored_row(), &request, upload_date())
            .expect("patches");

        assert_eq!(patched.phone, None);
        assert_eq!(patched.address, None);
        assert_eq!(patched.email, "jose@example.com");
        assert_eq!(
            patched.work_experiences[0].candidate_id,
            Some(CandidateId(9))
        );
    }

    #[test]
    fn mistyped_update_fields_are_reported() {
        let err = assemble(json!({ "id": 3, "phone": 612345678 })).expect_err("numeric phone");
        assert_eq!(err.category(), FieldCategory::Payload);
    }
}
