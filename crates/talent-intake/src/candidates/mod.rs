//! Candidate profile intake: payload validation, aggregate assembly, and persistence.
//!
//! A submission flows through [`CandidateRequest`] (create or edit), the [`CandidateValidator`]
//! (create only), the [`CandidateAssembler`], and finally [`CandidateService::save`], which
//! writes the candidate and its nested records through an injected [`CandidateStore`].

pub mod assembler;
pub mod domain;
pub mod persistence;
pub mod repository;
pub mod request;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use assembler::CandidateAssembler;
pub use domain::{Candidate, CandidateId, Education, Resume, WorkExperience};
pub use persistence::{PersistenceError, PersistenceOutcomeMapper, SaveMode};
pub use repository::{CandidateStore, EntityStore, Persistable, StorageFailure};
pub use request::{CandidateRequest, RequestError};
pub use router::candidate_router;
pub use service::{CandidateService, CandidateServiceError};
pub use validation::{
    CandidateValidator, FieldCategory, PhonePolicy, Requirement, ValidationError,
};
