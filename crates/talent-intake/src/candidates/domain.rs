use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-generated identifier for a candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root of the candidate aggregate. Owned collections are never absent, only empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Option<CandidateId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub educations: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub resumes: Vec<Resume>,
}

impl Candidate {
    /// Copy of the candidate row without its owned collections.
    pub fn scalar_row(&self) -> Self {
        Self {
            educations: Vec::new(),
            work_experiences: Vec::new(),
            resumes: Vec::new(),
            ..self.clone()
        }
    }
}

/// Education entry. Dates keep their submitted `YYYY-MM-DD` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: Option<u64>,
    pub candidate_id: Option<CandidateId>,
    pub institution: String,
    pub title: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: Option<u64>,
    pub candidate_id: Option<CandidateId>,
    pub company: String,
    pub position: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Reference to an uploaded CV. The file itself lives with the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Option<u64>,
    pub candidate_id: Option<CandidateId>,
    pub file_path: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
}
