//! In-process conversation memory keyed by thread id.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use agentdeck_llm::ModelMessage;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Thread = Arc<AsyncMutex<Vec<ModelMessage>>>;

/// Conversation history per thread id. Nothing is written to disk.
///
/// Each thread has its own async lock, so two requests on the same thread
/// run one after the other while different threads proceed independently.
/// Only threads holding at least one message are kept.
#[derive(Debug, Default)]
pub struct MemoryStore {
    threads: Mutex<HashMap<String, Thread>>,
}

/// Exclusive access to one thread's history for the duration of a turn.
///
/// Dropping the guard of a thread that is still empty, with nobody else
/// waiting on it, removes the thread from the store.
pub struct ThreadGuard<'a> {
    store: &'a MemoryStore,
    thread_id: String,
    history: OwnedMutexGuard<Vec<ModelMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a thread's history, creating an empty thread on first use.
    pub async fn checkout(&self, thread_id: &str) -> ThreadGuard<'_> {
        let thread = {
            let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(threads.entry(thread_id.to_owned()).or_default())
        };
        ThreadGuard {
            store: self,
            thread_id: thread_id.to_owned(),
            history: thread.lock_owned().await,
        }
    }

    /// Snapshot of a thread's history; empty for unknown threads.
    pub async fn history(&self, thread_id: &str) -> Vec<ModelMessage> {
        let thread = {
            let threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
            threads.get(thread_id).cloned()
        };
        match thread {
            Some(thread) => thread.lock().await.clone(),
            None => Vec::new(),
        }
    }

    pub fn thread_count(&self) -> usize {
        self.threads.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl Deref for ThreadGuard<'_> {
    type Target = Vec<ModelMessage>;

    fn deref(&self) -> &Self::Target {
        &self.history
    }
}

impl DerefMut for ThreadGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.history
    }
}

impl Drop for ThreadGuard<'_> {
    fn drop(&mut self) {
        if !self.history.is_empty() {
            return;
        }
        let mut threads = self.store.threads.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and this guard hold the only references: no turn is queued.
        if threads
            .get(&self.thread_id)
            .is_some_and(|thread| Arc::strong_count(thread) == 2)
        {
            threads.remove(&self.thread_id);
        }
    }
}
