use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use serde_json::{json, Value};

use crate::candidates::domain::{Candidate, CandidateId, Education, Resume, WorkExperience};
use crate::candidates::repository::{CandidateStore, EntityStore, StorageFailure};
use crate::candidates::{candidate_router, CandidateService, CandidateValidator};

pub(super) fn minimal_payload() -> Value {
    json!({
        "firstName": "Jo",
        "lastName": "González",
        "email": "jose@example.com",
        "phone": "612345678"
    })
}

pub(super) fn full_payload() -> Value {
    json!({
        "firstName": "Ana María",
        "lastName": "López",
        "email": "ana.lopez@example.com",
        "phone": "712345678",
        "address": "Calle Mayor 1, Madrid",
        "educations": [
            {
                "institution": "Universidad Politécnica",
                "title": "Ingeniería Informática",
                "startDate": "2008-09-01",
                "endDate": "2012-06-30"
            },
            {
                "institution": "UNED",
                "title": "Máster en Datos",
                "startDate": "2013-10-01"
            }
        ],
        "workExperiences": [
            {
                "company": "Acme",
                "position": "Backend engineer",
                "description": "Payments platform",
                "startDate": "2014-01-01",
                "endDate": "2019-12-31"
            }
        ],
        "cv": { "filePath": "uploads/ana.pdf", "fileType": "application/pdf" }
    })
}

#[derive(Default)]
struct Tables {
    candidates: BTreeMap<u64, Candidate>,
    educations: BTreeMap<u64, Education>,
    work_experiences: BTreeMap<u64, WorkExperience>,
    resumes: BTreeMap<u64, Resume>,
}

/// In-memory store with an optional injected failure per entity kind.
#[derive(Default)]
pub(super) struct MemoryStore {
    tables: Mutex<Tables>,
    sequence: AtomicU64,
    failures: Mutex<BTreeMap<&'static str, StorageFailure>>,
    writes: Mutex<Vec<&'static str>>,
}

impl MemoryStore {
    pub(super) fn failing(kind: &'static str, failure: StorageFailure) -> Self {
        let store = Self::default();
        store.fail_on(kind, failure);
        store
    }

    /// Make every later operation on `kind` fail with `failure`.
    pub(super) fn fail_on(&self, kind: &'static str, failure: StorageFailure) {
        self.failures
            .lock()
            .expect("failure mutex poisoned")
            .insert(kind, failure);
    }

    pub(super) fn writes(&self) -> Vec<&'static str> {
        self.writes.lock().expect("write log poisoned").clone()
    }

    pub(super) fn candidate_count(&self) -> usize {
        self.tables.lock().expect("tables poisoned").candidates.len()
    }

    fn record(&self, kind: &'static str) -> Result<u64, StorageFailure> {
        if let Some(failure) = self
            .failures
            .lock()
            .expect("failure mutex poisoned")
            .get(kind)
            .cloned()
        {
            return Err(failure);
        }
        self.writes.lock().expect("write log poisoned").push(kind);
        Ok(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl EntityStore<Candidate> for MemoryStore {
    async fn insert(&self, entity: &Candidate) -> Result<Candidate, StorageFailure> {
        let mut tables = self.tables.lock().expect("tables poisoned");
        if tables.candidates.values().any(|c| c.email == entity.email) {
            return Err(StorageFailure::UniquenessViolation {
                field: "email".to_string(),
            });
        }
        let id = self.record("candidate")?;
        let stored = Candidate {
            id: Some(CandidateId(id)),
            ..entity.clone()
        };
        tables.candidates.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: u64, entity: &Candidate) -> Result<Candidate, StorageFailure> {
        self.record("candidate")?;
        let mut tables = self.tables.lock().expect("tables poisoned");
        let slot = tables
            .candidates
            .get_mut(&id)
            .ok_or(StorageFailure::NotFound)?;
        *slot = entity.clone();
        Ok(slot.clone())
    }
}

macro_rules! child_store {
    ($entity:ty, $kind:literal, $table:ident) => {
        #[async_trait]
        impl EntityStore<$entity> for MemoryStore {
            async fn insert(&self, entity: &$entity) -> Result<$entity, StorageFailure> {
                let id = self.record($kind)?;
                let mut stored = entity.clone();
                stored.id = Some(id);
                self.tables
                    .lock()
                    .expect("tables poisoned")
                    .$table
                    .insert(id, stored.clone());
                Ok(stored)
            }

            async fn update(&self, id: u64, entity: &$entity) -> Result<$entity, StorageFailure> {
                self.record($kind)?;
                let mut tables = self.tables.lock().expect("tables poisoned");
                let slot = tables.$table.get_mut(&id).ok_or(StorageFailure::NotFound)?;
                *slot = entity.clone();
                Ok(slot.clone())
            }
        }
    };
}

child_store!(Education, "education", educations);
child_store!(WorkExperience, "work_experience", work_experiences);
child_store!(Resume, "resume", resumes);

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn fetch_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, StorageFailure> {
        if let Some(failure) = self
            .failures
            .lock()
            .expect("failure mutex poisoned")
            .get("fetch")
            .cloned()
        {
            return Err(failure);
        }

        let tables = self.tables.lock().expect("tables poisoned");
        let Some(candidate) = tables.candidates.get(&id.0) else {
            return Ok(None);
        };
        let owned_by = |owner: Option<CandidateId>| owner == Some(id);

        Ok(Some(Candidate {
            educations: tables
                .educations
                .values()
                .filter(|e| owned_by(e.candidate_id))
                .cloned()
                .collect(),
            work_experiences: tables
                .work_experiences
                .values()
                .filter(|w| owned_by(w.candidate_id))
                .cloned()
                .collect(),
            resumes: tables
                .resumes
                .values()
                .filter(|r| owned_by(r.candidate_id))
                .cloned()
                .collect(),
            ..candidate.clone()
        }))
    }
}

pub(super) fn build_service() -> (CandidateService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = CandidateService::new(store.clone(), CandidateValidator::default());
    (service, store)
}

pub(super) fn service_with(
    store: MemoryStore,
) -> (CandidateService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let service = CandidateService::new(store.clone(), CandidateValidator::default());
    (service, store)
}

pub(super) fn router_for(service: CandidateService<MemoryStore>) -> axum::Router {
    candidate_router(Arc::new(service))
}

pub(super) fn connection_failure() -> StorageFailure {
    StorageFailure::ConnectionFailure {
        detail: "db:5432".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
