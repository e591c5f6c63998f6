use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-wide store of inference-model handles, keyed by model identity.
///
/// Each distinct handle is initialized at most once, on first use; later
/// lookups are served from the cache. Handles are never mutated after
/// construction, so sharing the `Arc` across requests is safe. Owned by the
/// application's top-level context and passed by reference into whatever
/// needs a model.
#[derive(Debug, Default)]
pub struct ModelRegistry<T> {
    handles: Mutex<HashMap<String, Arc<T>>>,
}

impl<T> ModelRegistry<T> {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the handle registered under `key`, initializing it with
    /// `init` on first use. A failed initialization is not cached; the next
    /// caller retries.
    pub fn get_or_create<F, E>(&self, key: &str, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut handles = self.handles.lock().expect("model registry mutex poisoned");
        if let Some(handle) = handles.get(key) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(init()?);
        handles.insert(key.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .expect("model registry mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn initializes_each_key_at_most_once() {
        let registry: ModelRegistry<String> = ModelRegistry::new();
        let builds = AtomicUsize::new(0);

        for _ in 0..3 {
            let handle = registry
                .get_or_create("bandgap", || {
                    builds.fetch_add(1, Ordering::Relaxed);
                    Ok::<_, Infallible>("bandgap-model".to_string())
                })
                .expect("initializes");
            assert_eq!(handle.as_str(), "bandgap-model");
        }

        assert_eq!(builds.load(Ordering::Relaxed), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_handles() {
        let registry: ModelRegistry<u32> = ModelRegistry::new();
        let a = registry
            .get_or_create("a", || Ok::<_, Infallible>(1))
            .expect("a");
        let b = registry
            .get_or_create("b", || Ok::<_, Infallible>(2))
            .expect("b");
        assert_eq!((*a, *b), (1, 2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn failed_initialization_is_not_cached() {
        let registry: ModelRegistry<u32> = ModelRegistry::new();
        let err = registry.get_or_create("flaky", || Err::<u32, _>("load failed"));
        assert_eq!(err.unwrap_err(), "load failed");
        assert!(registry.is_empty());

        let handle = registry
            .get_or_create("flaky", || Ok::<_, &str>(7))
            .expect("retry succeeds");
        assert_eq!(*handle, 7);
    }
}
