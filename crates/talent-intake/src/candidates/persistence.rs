use tracing::warn;

use super::repository::{EntityStore, Persistable, StorageFailure};

const EMAIL_FIELD: &str = "email";

/// Whether a save inserts a new row or overwrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update(u64),
}

impl SaveMode {
    pub fn of<T: Persistable>(entity: &T) -> Self {
        match entity.storage_id() {
            Some(id) => Self::Update(id),
            None => Self::Create,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SaveMode::Create => "create",
            SaveMode::Update(_) => "update",
        }
    }
}

/// Storage failure after translation into the candidate domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("The email already exists in the database")]
    DuplicateEmail,
    #[error("No se pudo encontrar el registro del candidato")]
    CandidateNotFound,
    #[error("No se pudo conectar con la base de datos")]
    ConnectionUnavailable,
    /// Failures without a domain meaning keep their original message.
    #[error(transparent)]
    Storage(StorageFailure),
}

/// Dispatches saves to insert or update and normalizes the failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceOutcomeMapper;

impl PersistenceOutcomeMapper {
    /// Persist `entity`, choosing the path once from its identifier.
    pub async fn save<T, S>(&self, store: &S, entity: &T) -> Result<T, PersistenceError>
    where
        T: Persistable,
        S: EntityStore<T> + ?Sized,
    {
        let mode = SaveMode::of(entity);
        let outcome = match mode {
            SaveMode::Create => store.insert(entity).await,
            SaveMode::Update(id) => store.update(id, entity).await,
        };

        outcome.map_err(|failure| {
            warn!(mode = mode.label(), error = %failure, "storage write failed");
            self.map_failure(mode, failure)
        })
    }

    /// Connection loss wins over code-specific mappings, which win over passthrough.
    pub fn map_failure(&self, mode: SaveMode, failure: StorageFailure) -> PersistenceError {
        match (mode, failure) {
            (_, StorageFailure::ConnectionFailure { .. }) => {
                PersistenceError::ConnectionUnavailable
            }
            (SaveMode::Create, StorageFailure::UniquenessViolation { field })
                if field == EMAIL_FIELD =>
            {
                PersistenceError::DuplicateEmail
            }
            (SaveMode::Update(_), StorageFailure::NotFound) => PersistenceError::CandidateNotFound,
            (_, failure) => PersistenceError::Storage(failure),
        }
    }

    /// Read failures follow the update-path mapping.
    pub fn map_lookup(&self, failure: StorageFailure) -> PersistenceError {
        match failure {
            StorageFailure::ConnectionFailure { .. } => PersistenceError::ConnectionUnavailable,
            StorageFailure::NotFound => PersistenceError::CandidateNotFound,
            other => PersistenceError::Storage(other),
        }
    }
}
