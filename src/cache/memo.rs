//! Bounded expiring memoization for upstream fetches
//!
//! Provides a `MemoCache` that remembers the result of an expensive async
//! operation per distinct argument set, subject to a time-to-live and a
//! maximum entry count. Expiry is checked lazily on access; nothing sweeps
//! the table in the background.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::CallKey;

/// Default maximum number of cached entries
const DEFAULT_MAX_SIZE: usize = 128;

/// Default entry time-to-live
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Types that can report an empty result
///
/// The cache refuses to remember "nothing found": an empty value is handed
/// back to the caller but never stored, so the next identical call runs the
/// fetch again.
pub trait Emptiness {
    /// Whether this value carries no data worth caching
    fn is_empty(&self) -> bool;
}

impl<T> Emptiness for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl Emptiness for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl<T> Emptiness for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<K, V> Emptiness for HashMap<K, V> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl Emptiness for serde_json::Value {
    fn is_empty(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::Bool(b) => !b,
            serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(a) => a.is_empty(),
            serde_json::Value::Object(o) => o.is_empty(),
        }
    }
}

/// A stored value with its insertion timestamp
struct CacheEntry<T> {
    inserted_at: Instant,
    value: T,
}

/// Table state: the key/entry map and the insertion-order list
///
/// Invariant: `entries` and `order` always hold exactly the same key set,
/// and `order` never exceeds the configured maximum after an operation
/// completes.
struct CacheState<T> {
    entries: HashMap<CallKey, CacheEntry<T>>,
    order: VecDeque<CallKey>,
}

/// Bounded, time-expiring memo cache for one upstream operation
///
/// Eviction is strict FIFO by *first-ever* insertion order: refreshing an
/// expired entry gives it a fresh timestamp but keeps its original position
/// in the order list, so a frequently refreshed old key is still evicted
/// ahead of a newer, rarely used one. Callers depend on this eviction
/// timing; it is not an LRU.
///
/// The whole check-and-populate sequence runs under one async mutex, so two
/// concurrent calls for the same key trigger a single upstream fetch.
#[derive(Clone)]
pub struct MemoCache<T> {
    inner: Arc<Mutex<CacheState<T>>>,
    max_size: usize,
    ttl: Duration,
}

impl<T> Default for MemoCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoCache<T> {
    /// Creates a cache with the default capacity (128) and TTL (1 hour)
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            max_size: DEFAULT_MAX_SIZE,
            ttl: DEFAULT_TTL,
        }
    }

    /// Sets the maximum number of entries kept at once
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets how long an entry stays fresh after it was stored
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Number of entries currently in the table
    pub async fn len(&self) -> usize {
        self.inner.lock().await.order.len()
    }

    /// Whether the table is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.order.is_empty()
    }

    /// Whether the table currently holds an entry for `key`
    ///
    /// An expired entry still counts until a later call replaces or evicts
    /// it; expiry is only checked on access.
    pub async fn contains(&self, key: &CallKey) -> bool {
        self.inner.lock().await.entries.contains_key(key)
    }
}

impl<T: Clone + Emptiness> MemoCache<T> {
    /// Returns the cached value for `key`, fetching it if absent or expired
    ///
    /// The fetch is awaited while the table lock is held, so concurrent
    /// callers of this cache instance queue behind one upstream call. A
    /// fetch failure propagates unchanged and leaves the table untouched;
    /// the key is retried on the very next call. An empty fetch result is
    /// returned without being stored.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CallKey, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut state = self.inner.lock().await;
        let now = Instant::now();

        if let Some(entry) = state.entries.get(&key) {
            if now.duration_since(entry.inserted_at) <= self.ttl {
                return Ok(entry.value.clone());
            }
        }

        let value = fetch().await?;
        if value.is_empty() {
            return Ok(value);
        }

        // A refreshed key keeps its original slot in the order list.
        if !state.entries.contains_key(&key) {
            state.order.push_back(key.clone());
        }
        state.entries.insert(
            key,
            CacheEntry {
                inserted_at: now,
                value: value.clone(),
            },
        );
        while state.order.len() > self.max_size {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn key(name: &str) -> CallKey {
        CallKey::new().arg(name)
    }

    /// Builds a fetch closure that counts invocations and returns `value`
    fn counted_fetch(
        counter: &Arc<AtomicUsize>,
        value: Vec<u32>,
    ) -> impl FnOnce() -> std::future::Ready<Result<Vec<u32>, String>> {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_uses_cached_value() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1, 2, 3]))
            .await
            .expect("first call should succeed");
        let second = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![9, 9, 9]))
            .await
            .expect("second call should succeed");

        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![1, 2, 3], "second call should return the first value");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "fetch should run once");
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new().with_ttl(Duration::from_millis(5));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1]))
            .await
            .expect("first call should succeed");

        sleep(Duration::from_millis(20)).await;

        let refreshed = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![2]))
            .await
            .expect("refresh should succeed");

        assert_eq!(refreshed, vec![2], "expired entry should be replaced");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_stored() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(key("missing"), counted_fetch(&calls, Vec::new()))
                .await
                .expect("empty fetch should still succeed");
            assert!(value.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3, "every call should refetch");
        assert_eq!(cache.len().await, 0, "no entry should be created");
    }

    #[tokio::test]
    async fn test_capacity_evicts_first_inserted_key() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new().with_max_size(2);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1]))
            .await
            .expect("insert a");
        cache
            .get_or_fetch(key("b"), counted_fetch(&calls, vec![2]))
            .await
            .expect("insert b");
        cache
            .get_or_fetch(key("c"), counted_fetch(&calls, vec![3]))
            .await
            .expect("insert c");

        assert_eq!(cache.len().await, 2);
        assert!(!cache.contains(&key("a")).await, "oldest key should be evicted");
        assert!(cache.contains(&key("b")).await);
        assert!(cache.contains(&key("c")).await);
    }

    #[tokio::test]
    async fn test_refresh_does_not_move_key_in_eviction_order() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new()
            .with_max_size(2)
            .with_ttl(Duration::from_millis(5));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1]))
            .await
            .expect("insert a");
        cache
            .get_or_fetch(key("b"), counted_fetch(&calls, vec![2]))
            .await
            .expect("insert b");

        // Let both entries expire, then refresh "a" so it carries the newest
        // timestamp while keeping its original slot at the front.
        sleep(Duration::from_millis(20)).await;
        cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![10]))
            .await
            .expect("refresh a");

        cache
            .get_or_fetch(key("c"), counted_fetch(&calls, vec![3]))
            .await
            .expect("insert c");

        assert!(
            !cache.contains(&key("a")).await,
            "refreshed key should still be evicted first"
        );
        assert!(cache.contains(&key("b")).await);
        assert!(cache.contains(&key("c")).await);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_is_not_cached() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Err::<Vec<u32>, String>("upstream down".to_string()))
            }
        };
        let result = cache.get_or_fetch(key("a"), failing).await;
        assert_eq!(result, Err("upstream down".to_string()));
        assert_eq!(cache.len().await, 0, "failures are never cached");

        // The very next call retries and can succeed.
        let value = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1]))
            .await
            .expect("retry should succeed");
        assert_eq!(value, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_calls_for_same_key_fetch_once() {
        let cache: MemoCache<Vec<u32>> = MemoCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let slow_fetch = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                Ok::<Vec<u32>, String>(vec![7])
            }
        };

        let first = {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move { cache.get_or_fetch(key("a"), slow_fetch(calls)).await })
        };
        let second = {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move { cache.get_or_fetch(key("a"), slow_fetch(calls)).await })
        };

        let a = first.await.expect("task should not panic").expect("fetch ok");
        let b = second.await.expect("task should not panic").expect("fetch ok");

        assert_eq!(a, vec![7]);
        assert_eq!(b, vec![7]);
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "the second caller should reuse the first fetch"
        );
    }

    #[tokio::test]
    async fn test_expiry_and_eviction_scenario() {
        // ttl = 50ms stand-in for the documented 10s scenario.
        let cache: MemoCache<Vec<u32>> = MemoCache::new()
            .with_max_size(2)
            .with_ttl(Duration::from_millis(50));
        let calls = Arc::new(AtomicUsize::new(0));

        // t=0: store V1 under "a".
        let v1 = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![1]))
            .await
            .expect("store a");
        assert_eq!(v1, vec![1]);

        // Within the TTL window: returned without re-invoking.
        let hit = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![99]))
            .await
            .expect("hit a");
        assert_eq!(hit, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Past the TTL: re-invoked, new value stored.
        sleep(Duration::from_millis(70)).await;
        let v2 = cache
            .get_or_fetch(key("a"), counted_fetch(&calls, vec![2]))
            .await
            .expect("refresh a");
        assert_eq!(v2, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Two fresh keys on a capacity of 2 evict the earliest-inserted key.
        cache
            .get_or_fetch(key("b"), counted_fetch(&calls, vec![3]))
            .await
            .expect("store b");
        cache
            .get_or_fetch(key("c"), counted_fetch(&calls, vec![4]))
            .await
            .expect("store c");

        assert_eq!(cache.len().await, 2);
        assert!(!cache.contains(&key("a")).await);
    }

    #[tokio::test]
    async fn test_default_configuration() {
        let cache: MemoCache<Vec<u32>> = MemoCache::default();
        assert_eq!(cache.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(cache.ttl, DEFAULT_TTL);
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_emptiness_for_standard_containers() {
        assert!(Vec::<u32>::new().is_empty());
        assert!(!vec![1].is_empty());
        assert!(String::new().is_empty());
        assert!(!"x".to_string().is_empty());
        assert!(Emptiness::is_empty(&None::<u32>));
        assert!(!Emptiness::is_empty(&Some(1)));
        assert!(HashMap::<String, u32>::new().is_empty());
    }

    #[test]
    fn test_emptiness_for_json_values() {
        use serde_json::json;

        assert!(Emptiness::is_empty(&json!(null)));
        assert!(Emptiness::is_empty(&json!(false)));
        assert!(Emptiness::is_empty(&json!(0)));
        assert!(Emptiness::is_empty(&json!("")));
        assert!(Emptiness::is_empty(&json!([])));
        assert!(Emptiness::is_empty(&json!({})));

        assert!(!Emptiness::is_empty(&json!(true)));
        assert!(!Emptiness::is_empty(&json!(1)));
        assert!(!Emptiness::is_empty(&json!("x")));
        assert!(!Emptiness::is_empty(&json!([0])));
        assert!(!Emptiness::is_empty(&json!({"k": 0})));
    }
}
