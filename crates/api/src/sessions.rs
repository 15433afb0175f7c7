use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use inspectra_client::JourneySession;
use inspectra_core::error::CoreError;
use inspectra_core::types::Timestamp;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Shared handle to one session. Locked per operator action.
pub type SessionHandle = Arc<Mutex<JourneySession>>;

/// All open editing sessions, keyed by session id.
///
/// Thread-safe via interior `RwLock`; wrap it in `Arc` and share it across
/// the application.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a session and return its handle.
    pub async fn insert(&self, session: JourneySession) -> SessionHandle {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        tracing::debug!(session_id = %id, "Session opened");
        handle
    }

    /// Look up a session, failing with `NotFound`.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, CoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Session",
                id: id.to_string(),
            })
    }

    /// Discard a session and its unsaved document.
    pub async fn remove(&self, id: Uuid) -> Result<(), CoreError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::debug!(session_id = %id, "Session discarded");
                Ok(())
            }
            None => Err(CoreError::NotFound {
                entity: "Session",
                id: id.to_string(),
            }),
        }
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions not edited since `now - ttl`.
    ///
    /// Sessions that are locked by a request or have a save in flight are
    /// kept until a later sweep. Returns how many were dropped.
    pub async fn prune_idle(&self, now: Timestamp, ttl: chrono::Duration) -> usize {
        let Some(cutoff) = now.checked_sub_signed(ttl) else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, handle| {
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            if session.is_saving() || session.updated_at() >= cutoff {
                return true;
            }
            tracing::info!(
                session_id = %id,
                dirty = session.is_dirty(),
                updated_at = %session.updated_at(),
                "Evicting idle session"
            );
            false
        });

        before - sessions.len()
    }
}

/// Spawn a background task that evicts idle sessions every `interval`.
///
/// Runs for the life of the process; the returned handle can abort it.
pub fn start_idle_sweep(
    store: Arc<SessionStore>,
    interval: Duration,
    ttl: Duration,
) -> tokio::task::JoinHandle<()> {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            let evicted = store.prune_idle(chrono::Utc::now(), ttl).await;
            let open = store.count().await;
            tracing::debug!(evicted, open, "Session idle sweep");
        }
    })
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> JourneySession {
        JourneySession::new("Std Inspection", Some("acme".to_string()))
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::new();
        let handle = store.insert(session()).await;
        let id = handle.lock().await.id();
        let ttl = chrono::Duration::minutes(30);

        assert_eq!(store.prune_idle(chrono::Utc::now(), ttl).await, 0);
        assert!(store.get(id).await.is_ok());

        let later = chrono::Utc::now() + chrono::Duration::hours(1);
        assert_eq!(store.prune_idle(later, ttl).await, 1);
        assert_eq!(store.count().await, 0);
        assert!(store.get(id).await.is_err());
    }

    #[tokio::test]
    async fn locked_sessions_survive_the_sweep() {
        let store = SessionStore::new();
        let handle = store.insert(session()).await;
        let later = chrono::Utc::now() + chrono::Duration::hours(1);

        let guard = handle.lock().await;
        assert_eq!(store.prune_idle(later, chrono::Duration::minutes(30)).await, 0);
        drop(guard);

        assert_eq!(store.prune_idle(later, chrono::Duration::minutes(30)).await, 1);
    }

    #[tokio::test]
    async fn sessions_with_a_save_in_flight_survive_the_sweep() {
        let store = SessionStore::new();
        let mut session = session();
        session
            .edit(|doc| doc.add_block(inspectra_core::block::BlockType::Form).map(|_| ()))
            .unwrap();
        let prepared = session.prepare_save().unwrap();
        store.insert(session).await;
        let later = chrono::Utc::now() + chrono::Duration::hours(1);

        assert_eq!(store.prune_idle(later, chrono::Duration::minutes(30)).await, 0);
        drop(prepared);
        assert_eq!(store.prune_idle(later, chrono::Duration::minutes(30)).await, 1);
    }
}
