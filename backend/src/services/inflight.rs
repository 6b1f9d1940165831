//! Supersession of in-flight requests
//!
//! A dashboard that changes its period while a statistics request is still
//! running only cares about the newest answer. Work registered under the
//! same client key aborts whatever that key was still running.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

type InflightMap = HashMap<String, (u64, AbortHandle)>;

/// Why a supervised task produced no value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Request superseded by a newer request")]
    Superseded,

    #[error("Request task failed: {0}")]
    Failed(String),
}

#[derive(Default)]
struct Registry {
    inflight: InflightMap,
    next_generation: u64,
}

/// Tracks the newest in-flight task per client key
#[derive(Clone, Default)]
pub struct RequestSupersession {
    registry: Arc<Mutex<Registry>>,
}

/// Owns one registered task. Dropping it aborts the task and releases the
/// key unless a newer request already took it over.
struct InflightGuard {
    registry: Arc<Mutex<Registry>>,
    key: String,
    generation: u64,
    handle: AbortHandle,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.handle.abort();
        let mut registry = lock(&self.registry);
        if registry.inflight.get(&self.key).map(|(g, _)| *g) == Some(self.generation) {
            registry.inflight.remove(&self.key);
        }
    }
}

// Nothing panics while holding the lock; recover the map if it is poisoned
fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RequestSupersession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` as the newest request for `key`, aborting the previous one.
    ///
    /// Dropping the returned future aborts `work` and frees the key.
    pub async fn run<F, T>(&self, key: &str, work: F) -> Result<T, LoadError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(work);
        let _guard = self.register(key, &handle);

        match handle.await {
            Ok(value) => Ok(value),
            Err(e) if e.is_cancelled() => Err(LoadError::Superseded),
            Err(e) => Err(LoadError::Failed(e.to_string())),
        }
    }

    fn register<T>(&self, key: &str, task: &JoinHandle<T>) -> InflightGuard {
        let mut registry = lock(&self.registry);
        let generation = registry.next_generation;
        registry.next_generation += 1;

        if let Some((_, previous)) = registry
            .inflight
            .insert(key.to_string(), (generation, task.abort_handle()))
        {
            previous.abort();
            metrics::counter!("stats_requests_superseded_total").increment(1);
            debug!(client = key, "Superseded in-flight request");
        }

        InflightGuard {
            registry: Arc::clone(&self.registry),
            key: key.to_string(),
            generation,
            handle: task.abort_handle(),
        }
    }

    /// Whether `key` currently has a request running
    pub async fn is_in_flight(&self, key: &str) -> bool {
        lock(&self.registry).inflight.contains_key(key)
    }

    /// Number of keys with a request running
    pub fn in_flight_count(&self) -> usize {
        lock(&self.registry).inflight.len()
    }
}
