//! Singleflight coordinator
//!
//! Collapses concurrent fetches for the same key into one. The first caller
//! for a key becomes the leader: its fetch runs on a spawned task and every
//! caller (leader included) awaits a shared handle to the outcome. The
//! in-flight record is removed when the task finishes, whatever the
//! outcome, so a failed fetch never blocks the next attempt.
//!
//! Because the fetch runs detached from any caller, dropping a caller's
//! future (client disconnect) never cancels the fetch for the others.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;
use zipcast_domain::{Result, ZipcastError};

type SharedOutcome<T> = Shared<BoxFuture<'static, Result<T>>>;
type FlightMap<K, T> = Arc<Mutex<HashMap<K, Flight<T>>>>;

struct Flight<T> {
    id: u64,
    outcome: SharedOutcome<T>,
}

/// Per-key fetch deduplication.
pub struct FlightCoordinator<K, T> {
    flights: FlightMap<K, T>,
    next_id: AtomicU64,
}

impl<K, T> FlightCoordinator<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self { flights: Arc::new(Mutex::new(HashMap::new())), next_id: AtomicU64::new(1) }
    }

    /// Run `fetch` unless a fetch for `key` is already in flight, in which
    /// case wait for that one instead. Either way the caller observes the
    /// outcome of exactly one fetch.
    ///
    /// `fetch` is only invoked by the leader, after the registry lock has
    /// been released. Must be called from within a tokio runtime.
    pub async fn run_once<F, Fut>(&self, key: K, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (outcome, leader) = self.join_or_lead(&key);

        if let Some((id, sender)) = leader {
            // Created before `fetch` runs so that even a panicking fetch
            // clears the record.
            let guard = FlightGuard { flights: Arc::clone(&self.flights), key, id };
            let work = fetch();
            tokio::spawn(async move {
                let result = work.await;
                // Every waiter may have gone away; nothing to do then.
                let _ = sender.send(result);
                drop(guard);
            });
        }

        outcome.await
    }

    /// Number of keys with a fetch currently in flight.
    pub fn in_flight(&self) -> usize {
        self.flights.lock().len()
    }

    /// Atomic check-and-create: either join the existing flight for `key`
    /// or register a new one and hand back the sender that resolves it.
    fn join_or_lead(&self, key: &K) -> (SharedOutcome<T>, Option<(u64, oneshot::Sender<Result<T>>)>) {
        let mut flights = self.flights.lock();

        if let Some(flight) = flights.get(key) {
            debug!(key = ?key, flight_id = flight.id, "singleflight_join");
            return (flight.outcome.clone(), None);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel::<Result<T>>();
        let outcome = receiver
            .map(|received| {
                received.unwrap_or_else(|_| {
                    Err(ZipcastError::Internal("in-flight fetch ended without a result".into()))
                })
            })
            .boxed()
            .shared();

        flights.insert(key.clone(), Flight { id, outcome: outcome.clone() });
        debug!(key = ?key, flight_id = id, "singleflight_lead");
        (outcome, Some((id, sender)))
    }
}

impl<K, T> Default for FlightCoordinator<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the flight it was created for when dropped. Compares ids so a
/// finished flight never evicts a newer one registered under the same key.
struct FlightGuard<K: Eq + Hash, T> {
    flights: FlightMap<K, T>,
    key: K,
    id: u64,
}

impl<K: Eq + Hash, T> Drop for FlightGuard<K, T> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock();
        if flights.get(&self.key).is_some_and(|flight| flight.id == self.id) {
            flights.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_fetch() {
        let coordinator = Arc::new(FlightCoordinator::<String, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            handles.push(tokio::spawn(async move {
                coordinator
                    .run_once("80401".to_string(), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release.notified().await;
                        Ok(42)
                    })
                    .await
            }));
        }

        while coordinator.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        release.notify_one();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn failure_reaches_every_waiter_and_does_not_poison() {
        let coordinator = Arc::new(FlightCoordinator::<&'static str, u32>::new());
        let release = Arc::new(Notify::new());

        let leader = {
            let coordinator = Arc::clone(&coordinator);
            let release = Arc::clone(&release);
            tokio::spawn(async move {
                coordinator
                    .run_once("k", move || async move {
                        release.notified().await;
                        Err(ZipcastError::upstream_status("bad gateway", 502))
                    })
                    .await
            })
        };
        while coordinator.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        let follower = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator.run_once("k", || async { Ok(7) }).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        release.notify_one();

        let expected = ZipcastError::upstream_status("bad gateway", 502);
        assert_eq!(leader.await.unwrap(), Err(expected.clone()));
        assert_eq!(follower.await.unwrap(), Err(expected));

        while coordinator.in_flight() != 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(coordinator.run_once("k", || async { Ok(9) }).await, Ok(9));
    }

    #[tokio::test]
    async fn different_keys_do_not_wait_on_each_other() {
        let coordinator = Arc::new(FlightCoordinator::<u8, u8>::new());
        let blocked = Arc::new(Notify::new());

        let slow = {
            let coordinator = Arc::clone(&coordinator);
            let blocked = Arc::clone(&blocked);
            tokio::spawn(async move {
                coordinator
                    .run_once(1, move || async move {
                        blocked.notified().await;
                        Ok(1)
                    })
                    .await
            })
        };
        while coordinator.in_flight() == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(coordinator.run_once(2, || async { Ok(2) }).await, Ok(2));
        blocked.notify_one();
        assert_eq!(slow.await.unwrap(), Ok(1));
    }

    #[tokio::test]
    async fn cancelled_caller_does_not_cancel_the_fetch() {
        let coordinator = Arc::new(FlightCoordinator::<&'static str, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());

        let abandoned = {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            let release = Arc::clone(&release);
            tokio::spawn(async move {
                coordinator
                    .run_once("k", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release.notified().await;
                        Ok(5)
                    })
                    .await
            })
        };
        while coordinator.in_flight() == 0 {
            tokio::task::yield_now().await;
        }

        let waiter = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.run_once("k", || async { Ok(0) }).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        abandoned.abort();
        let _ = abandoned.await;
        release.notify_one();

        assert_eq!(waiter.await.unwrap(), Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_fetch_is_reported_and_cleared() {
        let coordinator = FlightCoordinator::<&'static str, u32>::new();

        let result = coordinator
            .run_once("k", || async {
                if true {
                    panic!("fetch blew up");
                }
                Ok(1)
            })
            .await;

        assert!(matches!(result, Err(ZipcastError::Internal(_))));
        assert_eq!(coordinator.in_flight(), 0);
        assert_eq!(coordinator.run_once("k", || async { Ok(2) }).await, Ok(2));
    }
}
