use crate::infra::InMemoryCandidateStore;
use chrono::{Datelike, Local};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use talent_intake::candidates::{CandidateService, CandidateServiceError, CandidateValidator};
use talent_intake::config::AppConfig;
use talent_intake::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON file holding a single candidate payload
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Email address used for the sample candidate
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Save only the candidate row, without education, work history, or CV
    #[arg(long)]
    pub(crate) minimal: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let validator = CandidateValidator::from_config(&config.intake);

    let raw = std::fs::read_to_string(&args.file)?;
    let payload: Value = serde_json::from_str(&raw)?;

    validator
        .validate(&payload)
        .map_err(CandidateServiceError::from)?;

    println!("{}: candidate payload is valid", args.file.display());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(InMemoryCandidateStore::default());
    let service = CandidateService::new(store, CandidateValidator::from_config(&config.intake));

    let payload = demo_payload(args.email.as_deref(), args.minimal);
    println!("Candidate intake demo");

    let candidate = service.save(payload.clone()).await?;
    let id = candidate.id.map(|id| id.to_string()).unwrap_or_default();
    println!(
        "- Stored candidate {} ({} {}) with {} education, {} work experience, {} CV entries",
        id,
        candidate.first_name,
        candidate.last_name,
        candidate.educations.len(),
        candidate.work_experiences.len(),
        candidate.resumes.len()
    );

    match service.save(payload).await {
        Ok(_) => println!("- Resubmission unexpectedly accepted"),
        Err(err) => println!("- Resubmitting the same email is rejected: {}", err),
    }

    println!("{}", serde_json::to_string_pretty(&candidate)?);
    Ok(())
}

fn demo_payload(email: Option<&str>, minimal: bool) -> Value {
    let email = email.unwrap_or("jose@example.com");
    if minimal {
        return json!({
            "firstName": "Jo",
            "lastName": "González",
            "email": email,
            "phone": "612345678"
        });
    }

    let this_year = Local::now().year();
    json!({
        "firstName": "José",
        "lastName": "González",
        "email": email,
        "phone": "612345678",
        "address": "Calle Mayor 1, Madrid",
        "educations": [{
            "institution": "Universidad Complutense",
            "title": "Ingeniería Informática",
            "startDate": format!("{}-09-01", this_year - 10),
            "endDate": format!("{}-06-30", this_year - 6)
        }],
        "workExperiences": [{
            "company": "Acme Talent",
            "position": "Backend engineer",
            "description": "Candidate pipeline services",
            "startDate": format!("{}-01-15", this_year - 5)
        }],
        "cv": { "filePath": "uploads/jose-gonzalez.pdf", "fileType": "application/pdf" }
    })
}
