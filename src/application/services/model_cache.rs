use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::ports::{InferenceBackend, InferenceError, SpeechModel};
use crate::domain::ModelKey;

/// A model held by the cache: the shared handle plus load metadata.
#[derive(Clone)]
pub struct CachedModel {
    pub key: ModelKey,
    pub handle: Arc<dyn SpeechModel>,
    pub loaded_at: Instant,
}

struct CacheState {
    loaded: HashMap<ModelKey, CachedModel>,
    /// One gate per key, installed on first request and kept for the process
    /// lifetime so every load attempt for a key serializes on the same mutex,
    /// including retries after a failed load. The key set is a handful of
    /// model variants, so the map never meaningfully grows.
    gates: HashMap<ModelKey, Arc<Mutex<()>>>,
}

/// Process-lifetime cache of loaded speech models. Loading a Whisper variant
/// costs seconds to minutes, so each key is loaded at most once; concurrent
/// requests for a key still loading wait for that load instead of starting
/// their own. Failed loads are not cached, so the next request retries.
pub struct InferenceModelCache {
    backend: Arc<dyn InferenceBackend>,
    state: Mutex<CacheState>,
}

impl InferenceModelCache {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(CacheState {
                loaded: HashMap::new(),
                gates: HashMap::new(),
            }),
        }
    }

    /// Returns the cached handle for `key`, loading it first if needed.
    /// Repeated calls return clones of the same `Arc` handle.
    pub async fn get(&self, key: &ModelKey) -> Result<CachedModel, InferenceError> {
        let gate = {
            let mut state = self.state.lock().await;
            if let Some(cached) = state.loaded.get(key) {
                return Ok(cached.clone());
            }
            Arc::clone(
                state
                    .gates
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        let _guard = gate.lock().await;

        // A load that finished while this task queued on the gate wins.
        {
            let state = self.state.lock().await;
            if let Some(cached) = state.loaded.get(key) {
                return Ok(cached.clone());
            }
        }

        info!(model = %key, "Loading speech model");
        let started = Instant::now();
        let result = self.backend.load(key).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(handle) => {
                info!(model = %key, elapsed_ms = started.elapsed().as_millis() as u64, "Speech model loaded");
                let cached = CachedModel {
                    key: key.clone(),
                    handle,
                    loaded_at: Instant::now(),
                };
                state.loaded.insert(key.clone(), cached.clone());
                Ok(cached)
            }
            Err(error) => {
                warn!(model = %key, error = %error, "Speech model load failed");
                Err(error)
            }
        }
    }

    /// Warms the cache in the background. Each key loads in its own detached
    /// task; failures are logged and never surface to the caller.
    pub fn preload(self: Arc<Self>, keys: Vec<ModelKey>) {
        for key in keys {
            let cache = Arc::clone(&self);
            tokio::spawn(async move {
                match cache.get(&key).await {
                    Ok(_) => info!(model = %key, "Preloaded speech model"),
                    Err(error) => warn!(model = %key, error = %error, "Preload failed"),
                }
            });
        }
    }

    pub async fn cached_keys(&self) -> Vec<ModelKey> {
        let state = self.state.lock().await;
        state.loaded.keys().cloned().collect()
    }
}
