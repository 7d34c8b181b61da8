use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::workflow::session::{Session, SessionId};

/// One session behind its own lock. Never hold the guard across an
/// external AI call.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Upper bound on how often idle sessions are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory registry of live sessions. Sessions nobody has looked up for
/// longer than the idle TTL are evicted by [`spawn_sweeper`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl SessionStore {
    pub async fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new(id)));
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        info!("Created session {id} ({} live)", sessions.len());
        handle
    }

    /// Looks a session up and marks it as seen.
    pub async fn get(&self, id: SessionId) -> Result<SessionHandle, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_seen = Instant::now();
        Ok(entry.handle.clone())
    }

    pub async fn remove(&self, id: SessionId) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Removed session {id}"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops every session idle for longer than `ttl`; returns how many.
    /// Calls still in flight for an evicted session finish against their
    /// own handle and are never visible again.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s) ({} live)", sessions.len());
        }
        evicted
    }
}

/// Periodically evicts sessions idle for longer than `ttl`.
pub fn spawn_sweeper(store: SessionStore, ttl: Duration) -> JoinHandle<()> {
    let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            store.evict_idle(ttl).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::default();
        let handle = store.create().await;
        let id = handle.lock().await.id;

        assert!(store.get(id).await.is_ok());
        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(store.remove(id).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_keeps_session_alive() {
        let store = SessionStore::default();
        let id = store.create().await.lock().await.id;

        tokio::time::advance(Duration::from_secs(1800)).await;
        store.get(id).await.unwrap();
        tokio::time::advance(Duration::from_secs(2700)).await;

        assert_eq!(store.evict_idle(TTL).await, 0);
        assert!(store.get(id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_evicted() {
        let store = SessionStore::default();
        let idle = store.create().await.lock().await.id;
        tokio::time::advance(Duration::from_secs(3000)).await;
        let fresh = store.create().await.lock().await.id;
        tokio::time::advance(Duration::from_secs(601)).await;

        assert_eq!(store.evict_idle(TTL).await, 1);
        assert!(matches!(store.get(idle).await, Err(AppError::NotFound(_))));
        assert!(store.get(fresh).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = SessionStore::default();
        let id = store.create().await.lock().await.id;
        let sweeper = spawn_sweeper(store.clone(), TTL);

        tokio::time::sleep(TTL + MAX_SWEEP_INTERVAL * 2).await;

        assert!(store.get(id).await.is_err());
        sweeper.abort();
    }
}
