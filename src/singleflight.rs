//! Singleflight Module
//!
//! Collapses concurrent calls for the same key into one execution whose
//! result every caller shares.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::CacheError;

type ResultSlot<V> = Option<Result<V, CacheError>>;

// == Flight ==
/// Per-key call deduplication.
///
/// The first caller for a key becomes the leader and runs the work; every
/// caller that arrives while the call is in flight waits on the leader's
/// latch and receives the same result. Once the leader finishes, the key
/// is forgotten — results are not cached here.
///
/// The pending-call map is locked only to register or look up a call,
/// never while the work runs.
pub struct Flight<V> {
    calls: Mutex<HashMap<String, watch::Receiver<ResultSlot<V>>>>,
}

impl<V> Default for Flight<V> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone + Send + Sync> Flight<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` for `key`, or waits for the in-flight call and
    /// returns its result.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> Result<V, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CacheError>>,
    {
        let tx = {
            let mut calls = self.calls.lock();
            match calls.get(key) {
                Some(rx) => {
                    // A call is in flight; wait on its latch outside the lock.
                    let mut rx = rx.clone();
                    drop(calls);
                    return Self::wait(&mut rx).await;
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), rx);
                    tx
                }
            }
        };

        // Leader path. The guard removes the map entry on every exit,
        // unwinding included; dropping `tx` without a send closes the
        // latch so waiters are never stranded.
        let _guard = CallGuard {
            flight: self,
            key: key.to_string(),
        };

        let result = work().await;
        let _ = tx.send(Some(result.clone()));
        result
    }

    async fn wait(rx: &mut watch::Receiver<ResultSlot<V>>) -> Result<V, CacheError> {
        match rx.wait_for(|slot| slot.is_some()).await {
            Ok(slot) => slot.clone().expect("latch signaled with a result"),
            // The leader unwound before publishing a result.
            Err(_) => Err(CacheError::Internal(
                "in-flight call aborted before completing".to_string(),
            )),
        }
    }
}

struct CallGuard<'a, V> {
    flight: &'a Flight<V>,
    key: String,
}

impl<V> Drop for CallGuard<'_, V> {
    fn drop(&mut self) {
        self.flight.calls.lock().remove(&self.key);
    }
}

impl<V> std::fmt::Debug for Flight<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flight")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}
