use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use talent_intake::candidates::{
    Candidate, CandidateId, CandidateStore, Education, EntityStore, Resume, StorageFailure,
    WorkExperience,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    candidates: BTreeMap<u64, Candidate>,
    educations: BTreeMap<u64, Education>,
    work_experiences: BTreeMap<u64, WorkExperience>,
    resumes: BTreeMap<u64, Resume>,
}

/// Process-local storage adapter. Enforces the unique email constraint like the relational
/// backend it stands in for.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateStore {
    tables: Arc<Mutex<Tables>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryCandidateStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageFailure> {
        self.tables
            .lock()
            .map_err(|_| StorageFailure::ConnectionFailure {
                detail: "in-memory store poisoned".to_string(),
            })
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<u64>) -> bool {
    tables
        .candidates
        .iter()
        .any(|(id, row)| Some(*id) != except && row.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl EntityStore<Candidate> for InMemoryCandidateStore {
    async fn insert(&self, entity: &Candidate) -> Result<Candidate, StorageFailure> {
        let mut tables = self.tables()?;
        if email_taken(&tables, &entity.email, None) {
            return Err(StorageFailure::UniquenessViolation {
                field: "email".to_string(),
            });
        }

        let id = self.next_id();
        let stored = Candidate {
            id: Some(CandidateId(id)),
            ..entity.scalar_row()
        };
        tables.candidates.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: u64, entity: &Candidate) -> Result<Candidate, StorageFailure> {
        let mut tables = self.tables()?;
        if !tables.candidates.contains_key(&id) {
            return Err(StorageFailure::NotFound);
        }
        if email_taken(&tables, &entity.email, Some(id)) {
            return Err(StorageFailure::UniquenessViolation {
                field: "email".to_string(),
            });
        }

        let stored = Candidate {
            id: Some(CandidateId(id)),
            ..entity.scalar_row()
        };
        tables.candidates.insert(id, stored.clone());
        Ok(stored)
    }
}

macro_rules! owned_table {
    ($entity:ty, $table:ident) => {
        #[async_trait]
        impl EntityStore<$entity> for InMemoryCandidateStore {
            async fn insert(&self, entity: &$entity) -> Result<$entity, StorageFailure> {
                let mut tables = self.tables()?;
                let owner_exists = entity
                    .candidate_id
                    .is_some_and(|owner| tables.candidates.contains_key(&owner.0));
                if !owner_exists {
                    return Err(StorageFailure::Other {
                        detail: format!(
                            "Foreign key constraint failed on the field: `{}_candidateId_fkey`",
                            stringify!($entity)
                        ),
                    });
                }

                let id = self.next_id();
                let mut stored = entity.clone();
                stored.id = Some(id);
                tables.$table.insert(id, stored.clone());
                Ok(stored)
            }

            async fn update(&self, id: u64, entity: &$entity) -> Result<$entity, StorageFailure> {
                let mut tables = self.tables()?;
                let slot = tables.$table.get_mut(&id).ok_or(StorageFailure::NotFound)?;
                *slot = entity.clone();
                Ok(slot.clone())
            }
        }
    };
}

owned_table!(Education, educations);
owned_table!(WorkExperience, work_experiences);
owned_table!(Resume, resumes);

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn fetch_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StorageFailure> {
        let tables = self.tables()?;
        let Some(row) = tables.candidates.get(&id.0) else {
            return Ok(None);
        };

        Ok(Some(Candidate {
            educations: tables
                .educations
                .values()
                .filter(|entry| entry.candidate_id == Some(id))
                .cloned()
                .collect(),
            work_experiences: tables
                .work_experiences
                .values()
                .filter(|entry| entry.candidate_id == Some(id))
                .cloned()
                .collect(),
            resumes: tables
                .resumes
                .values()
                .filter(|entry| entry.candidate_id == Some(id))
                .cloned()
                .collect(),
            ..row.clone()
        }))
    }
}
