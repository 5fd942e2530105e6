use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use super::assembler::CandidateAssembler;
use super::domain::{Candidate, CandidateId};
use super::persistence::{PersistenceError, PersistenceOutcomeMapper};
use super::repository::{CandidateStore, EntityStore, Persistable, StorageFailure};
use super::request::{CandidateRequest, RequestError};
use super::validation::{CandidateValidator, ValidationError};

/// Service composing the validator, assembler, and outcome mapper over an injected store.
pub struct CandidateService<S> {
    validator: Arc<CandidateValidator>,
    store: Arc<S>,
    assembler: CandidateAssembler,
    mapper: PersistenceOutcomeMapper,
}

impl<S> CandidateService<S>
where
    S: CandidateStore + 'static,
{
    pub fn new(store: Arc<S>, validator: CandidateValidator) -> Self {
        Self {
            validator: Arc::new(validator),
            store,
            assembler: CandidateAssembler,
            mapper: PersistenceOutcomeMapper,
        }
    }

    pub fn validator(&self) -> &CandidateValidator {
        &self.validator
    }

    /// Validate, assemble, and persist a raw payload.
    ///
    /// Edits are applied as a patch over the stored row, so an unknown identifier fails with
    /// [`PersistenceError::CandidateNotFound`] before anything is written.
    ///
    /// The candidate row is written first, then each education, work experience, and resume in
    /// submission order. Writes are not transactional: when a nested write fails its error is
    /// returned and the rows already stored are left in place.
    pub async fn save(&self, payload: Value) -> Result<Candidate, CandidateServiceError> {
        let request = CandidateRequest::from_payload(payload)?;
        self.validator.validate_request(&request)?;

        let upload_date = Utc::now();
        let candidate = match request.id() {
            None => self.assembler.assemble(&request, upload_date)?,
            Some(id) => {
                let stored = self.get(id).await?;
                self.assembler.patch(&stored, &request, upload_date)?
            }
        };
        let stored = self
            .mapper
            .save(self.store.as_ref(), &candidate.scalar_row())
            .await?;
        let candidate_id = stored.id.ok_or_else(|| {
            PersistenceError::Storage(StorageFailure::Other {
                detail: "storage returned a candidate without an identifier".to_string(),
            })
        })?;

        let mut aggregate = Candidate {
            educations: Vec::with_capacity(candidate.educations.len()),
            work_experiences: Vec::with_capacity(candidate.work_experiences.len()),
            resumes: Vec::with_capacity(candidate.resumes.len()),
            ..stored
        };

        for mut education in candidate.educations {
            education.candidate_id = Some(candidate_id);
            aggregate.educations.push(self.save_child(education).await?);
        }
        for mut experience in candidate.work_experiences {
            experience.candidate_id = Some(candidate_id);
            aggregate.work_experiences.push(self.save_child(experience).await?);
        }
        for mut resume in candidate.resumes {
            resume.candidate_id = Some(candidate_id);
            aggregate.resumes.push(self.save_child(resume).await?);
        }

        info!(
            candidate_id = %candidate_id,
            update = request.is_update(),
            educations = aggregate.educations.len(),
            work_experiences = aggregate.work_experiences.len(),
            resumes = aggregate.resumes.len(),
            "candidate saved"
        );

        Ok(aggregate)
    }

    /// Fetch a stored candidate with its owned collections.
    pub async fn get(&self, id: CandidateId) -> Result<Candidate, CandidateServiceError> {
        let candidate = self
            .store
            .fetch_candidate(id)
            .await
            .map_err(|failure| self.mapper.map_lookup(failure))?
            .ok_or(PersistenceError::CandidateNotFound)?;
        Ok(candidate)
    }

    async fn save_child<T>(&self, entity: T) -> Result<T, PersistenceError>
    where
        T: Persistable,
        S: EntityStore<T>,
    {
        debug!(existing = entity.storage_id().is_some(), "saving nested record");
        self.mapper.save(self.store.as_ref(), &entity).await
    }
}

/// Error raised by the candidate service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Identifiers that cannot address a row surface the way the store would report them.
impl From<RequestError> for CandidateServiceError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Malformed(err) => Self::Validation(err),
            unusable @ RequestError::UnusableIdentifier { .. } => {
                Self::Persistence(PersistenceError::Storage(StorageFailure::Other {
                    detail: unusable.to_string(),
                }))
            }
        }
    }
}

impl CandidateServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CandidateServiceError::Persistence(PersistenceError::CandidateNotFound)
        )
    }
}
