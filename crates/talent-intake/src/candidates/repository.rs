use async_trait::async_trait;

use super::domain::{Candidate, CandidateId, Education, Resume, WorkExperience};

/// Classified failure reported by a storage adapter.
///
/// Adapters translate their backend's error codes into this closed set so the outcome mapper
/// never inspects raw codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageFailure {
    #[error("Unique constraint failed on the fields: ({field})")]
    UniquenessViolation { field: String },
    #[error("Record to update not found.")]
    NotFound,
    #[error("Can't reach database server: {detail}")]
    ConnectionFailure { detail: String },
    #[error("{detail}")]
    Other { detail: String },
}

/// Row that may or may not already exist in storage.
pub trait Persistable: Clone + Send + Sync {
    /// Storage key, `None` for rows that have not been inserted yet.
    fn storage_id(&self) -> Option<u64>;
}

impl Persistable for Candidate {
    fn storage_id(&self) -> Option<u64> {
        self.id.map(|id| id.0)
    }
}

impl Persistable for Education {
    fn storage_id(&self) -> Option<u64> {
        self.id
    }
}

impl Persistable for WorkExperience {
    fn storage_id(&self) -> Option<u64> {
        self.id
    }
}

impl Persistable for Resume {
    fn storage_id(&self) -> Option<u64> {
        self.id
    }
}

/// Insert/update primitives for a single entity kind.
#[async_trait]
pub trait EntityStore<T: Persistable>: Send + Sync {
    /// Store a new row and return it with its generated identifier.
    async fn insert(&self, entity: &T) -> Result<T, StorageFailure>;
    /// Overwrite the row keyed by `id` and return the stored representation.
    async fn update(&self, id: u64, entity: &T) -> Result<T, StorageFailure>;
}

/// Storage collaborator for the whole candidate aggregate.
#[async_trait]
pub trait CandidateStore:
    EntityStore<Candidate>
    + EntityStore<Education>
    + EntityStore<WorkExperience>
    + EntityStore<Resume>
{
    /// Load a candidate with its owned collections.
    async fn fetch_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StorageFailure>;
}
