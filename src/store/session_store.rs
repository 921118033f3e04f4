use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard, RwLock as AsyncRwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::session::Session;
use crate::services::timer_service::TimerHandle;

/// One registered session. Writers (`next`/`submit`) serialize on
/// `write_gate` for the whole operation; `state` is only held for the
/// snapshot and the commit, so display reads never wait on collaborator
/// I/O and no network call runs under the state lock.
pub struct SessionEntry {
    state: AsyncRwLock<Session>,
    write_gate: Mutex<()>,
    timer: std::sync::Mutex<Option<TimerHandle>>,
    last_access: AtomicU64,
}

impl SessionEntry {
    fn new(session: Session, now_secs: u64) -> Self {
        Self {
            state: AsyncRwLock::new(session),
            write_gate: Mutex::new(()),
            timer: std::sync::Mutex::new(None),
            last_access: AtomicU64::new(now_secs),
        }
    }

    /// Serialize a mutating operation against this session.
    pub async fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, Session> {
        self.state.read().await
    }

    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, Session> {
        self.state.write().await
    }

    /// Install the countdown for a newly delivered question, cancelling
    /// any timer left over from the previous one.
    pub fn install_timer(&self, handle: TimerHandle) {
        let mut slot = self.timer.lock().expect("timer mutex poisoned");
        if let Some(old) = slot.take() {
            old.cancel();
        }
        *slot = Some(handle);
    }

    pub fn cancel_timer(&self) {
        let mut slot = self.timer.lock().expect("timer mutex poisoned");
        if let Some(handle) = slot.take() {
            handle.cancel();
        }
    }

    pub fn pause_timer(&self) {
        let slot = self.timer.lock().expect("timer mutex poisoned");
        if let Some(handle) = slot.as_ref() {
            handle.pause();
        }
    }

    pub fn resume_timer(&self) {
        let slot = self.timer.lock().expect("timer mutex poisoned");
        if let Some(handle) = slot.as_ref() {
            handle.resume();
        }
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        let slot = self.timer.lock().expect("timer mutex poisoned");
        slot.as_ref().map(|handle| handle.remaining_seconds())
    }

    fn touch(&self, now_secs: u64) {
        self.last_access.store(now_secs, Ordering::Relaxed);
    }

    fn idle_since(&self, now_secs: u64) -> u64 {
        now_secs.saturating_sub(self.last_access.load(Ordering::Relaxed))
    }
}

/// Concurrency-safe registry of live sessions. The map lock is only held
/// for map operations; per-session work happens on the entry's own locks,
/// so sessions never contend with one another.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<SessionEntry>>>,
    epoch: Instant,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            epoch: Instant::now(),
            ttl,
        }
    }

    fn now_secs(&self) -> u64 {
        self.epoch.elapsed().as_secs()
    }

    pub fn insert(&self, session: Session) -> Arc<SessionEntry> {
        let id = session.id;
        let entry = Arc::new(SessionEntry::new(session, self.now_secs()));
        self.sessions
            .write()
            .expect("session map poisoned")
            .insert(id, entry.clone());
        debug!(session_id = %id, "session registered");
        entry
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<SessionEntry>> {
        let entry = self
            .sessions
            .read()
            .expect("session map poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("session {} not found", id)))?;
        entry.touch(self.now_secs());
        Ok(entry)
    }

    pub fn remove(&self, id: Uuid) -> Option<Arc<SessionEntry>> {
        let entry = self
            .sessions
            .write()
            .expect("session map poisoned")
            .remove(&id);
        if let Some(entry) = &entry {
            entry.cancel_timer();
            debug!(session_id = %id, "session removed");
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("session map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle past the TTL and cancel their timers. Run
    /// periodically by the sweeper task.
    pub fn evict_idle(&self) -> usize {
        let now = self.now_secs();
        let ttl = self.ttl.as_secs();
        let mut evicted = Vec::new();
        {
            let mut map = self.sessions.write().expect("session map poisoned");
            map.retain(|id, entry| {
                if entry.idle_since(now) > ttl {
                    evicted.push((*id, entry.clone()));
                    false
                } else {
                    true
                }
            });
        }
        for (id, entry) in &evicted {
            entry.cancel_timer();
            info!(session_id = %id, "evicted idle session");
        }
        evicted.len()
    }
}
