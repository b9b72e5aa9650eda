use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::interview::session::InterviewSession;

/// Idle time after which an abandoned session is discarded.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// A session guarded by its own lock. Handlers hold the lock for a whole
/// request pass, so actions on one session never interleave.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

struct Entry {
    handle: SessionHandle,
    last_touched: Instant,
}

/// Process-local registry of interview sessions.
///
/// Every lookup refreshes a session's idle clock; sessions idle for longer
/// than the TTL are swept on `create` and by the background sweeper.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        self.sweep_expired().await;

        let session = InterviewSession::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_touched: Instant::now(),
            },
        );
        info!("Session {id} created");
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(entry.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} discarded");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for longer than the TTL. A session whose lock is
    /// held by an in-flight request is kept. Returns how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_touched.elapsed() <= self.ttl || entry.handle.try_lock().is_err()
        });
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {expired} idle sessions");
        }
        expired
    }

    /// Runs `sweep_expired` every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.sweep_expired().await;
            }
        })
    }
}
