use addiction_assessor::assessment::{SessionId, SessionRecord, SessionStore, StoreError};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type Records = HashMap<SessionId, SessionRecord>;

/// Process-local session store holding at most `capacity` interviews.
///
/// Sessions untouched for longer than `idle_ttl` are treated as gone and
/// are evicted before a new session is admitted.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<Records>>,
    capacity: usize,
    idle_ttl: Duration,
}

impl InMemorySessionStore {
    pub(crate) fn with_limits(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            capacity,
            idle_ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store lock poisoned".to_string()))
    }

    fn is_idle(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        // A clock that moved backwards yields a negative span, which never expires.
        now.signed_duration_since(record.updated_at)
            .to_std()
            .map(|idle| idle > self.idle_ttl)
            .unwrap_or(false)
    }

    fn evict_idle(&self, records: &mut Records, now: DateTime<Utc>) {
        let before = records.len();
        records.retain(|_, record| !self.is_idle(record, now));
        let evicted = before - records.len();
        if evicted > 0 {
            debug!(evicted, remaining = records.len(), "evicted idle assessment sessions");
        }
    }

    /// Live record for `id`, dropping it first if it has gone idle.
    fn live<'a>(&self, records: &'a mut Records, id: &SessionId) -> Option<&'a mut SessionRecord> {
        let now = Utc::now();
        if records.get(id).is_some_and(|record| self.is_idle(record, now)) {
            records.remove(id);
            debug!(session_id = %id.0, "idle assessment session expired");
            return None;
        }
        records.get_mut(id)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.lock()?;
        self.evict_idle(&mut guard, Utc::now());
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        if guard.len() >= self.capacity {
            return Err(StoreError::Capacity(self.capacity));
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn modify<R, F>(&self, id: &SessionId, change: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        let mut guard = self.lock()?;
        let record = self.live(&mut guard, id).ok_or(StoreError::NotFound)?;
        Ok(change(record))
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let mut guard = self.lock()?;
        Ok(self.live(&mut guard, id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
