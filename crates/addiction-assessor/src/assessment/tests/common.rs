use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::conversation::Conversation;
use crate::assessment::domain::Profile;
use crate::assessment::repository::{SessionId, SessionRecord, SessionStore, StoreError};
use crate::assessment::{assessment_router, AssessmentService, ScoringWeights};

/// Answers typed by the reference student, in questionnaire order.
pub(super) const SCENARIO_ANSWERS: [&str; 10] = [
    "19",
    "female",
    "undergraduate",
    "5.2",
    "Instagram",
    "yes",
    "6.5",
    "6",
    "single",
    "3",
];

pub(super) fn scenario_profile() -> Profile {
    Profile {
        age: 19.0,
        gender: "female".to_string(),
        academic_level: "undergraduate".to_string(),
        daily_usage: 5.2,
        platform: "Instagram".to_string(),
        academic_impact: "yes".to_string(),
        sleep_hours: 6.5,
        mental_health: 6.0,
        relationship_status: "single".to_string(),
        conflicts: 3.0,
    }
}

pub(super) fn minimal_profile() -> Profile {
    Profile {
        age: 30.0,
        gender: "male".to_string(),
        academic_level: "high school".to_string(),
        daily_usage: 0.0,
        platform: "Facebook".to_string(),
        academic_impact: "no".to_string(),
        sleep_hours: 12.0,
        mental_health: 10.0,
        relationship_status: "single".to_string(),
        conflicts: 0.0,
    }
}

pub(super) fn maximal_profile() -> Profile {
    Profile {
        age: 15.0,
        gender: "female".to_string(),
        academic_level: "undergraduate".to_string(),
        daily_usage: 24.0,
        platform: "Other".to_string(),
        academic_impact: "yes".to_string(),
        sleep_hours: 3.0,
        mental_health: 1.0,
        relationship_status: "complicated".to_string(),
        conflicts: 5.0,
    }
}

pub(super) fn completed_conversation() -> Conversation {
    let mut conversation = Conversation::new();
    for answer in SCENARIO_ANSWERS {
        conversation.submit(answer).expect("scenario answer accepted");
    }
    conversation
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(store.clone(), ScoringWeights::STANDARD);
    (service, store)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemoryStore {
    pub(super) fn stored(&self, id: &SessionId) -> Option<SessionRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn modify<R, F>(&self, id: &SessionId, change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        Ok(change(record))
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

pub(super) struct FullStore;

impl SessionStore for FullStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Capacity(0))
    }

    fn modify<R, F>(&self, _id: &SessionId, _change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        Err(StoreError::NotFound)
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Ok(None)
    }

    fn remove(&self, _id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn modify<R, F>(&self, _id: &SessionId, _change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
