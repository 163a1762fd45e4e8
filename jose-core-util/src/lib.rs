//! Pooling and bounded-cache primitives shared by the `jose-core` crates.
//!
//! Neither type reaches into the algorithm layer: `Pool<T>` just recycles
//! whatever stateful object an engine hands it, and `HeaderCache<K, V>` just
//! remembers the last `capacity` distinct keys it saw. The signer/wrapper
//! engines in `jose-core-jws`/`jose-core-jwe` decide what `T` is.

#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![forbid(unsafe_code)]

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};

/// Default pool capacity when the caller doesn't size it explicitly:
/// `2 * logical cores`, per the concurrency model's resource sizing rule.
pub fn default_pool_capacity() -> usize {
    2 * std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// A bounded pool of reusable, expensive-to-construct objects (AES key
/// schedules, RSA key handles, padded HMAC state).
///
/// Objects are claimed with [`Pool::acquire_or`], which pops a free slot if
/// one exists or falls back to constructing a fresh one. The returned
/// [`PoolGuard`] pushes the object back on drop, including on an unwinding
/// panic, so a pool never leaks its contents across an exit path.
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T> Pool<T> {
    /// Create a pool that retains at most `capacity` idle objects. Objects
    /// beyond that are simply dropped on release rather than queued.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    /// A pool sized for a single ephemeral object: nothing is retained
    /// across uses, avoiding contention on a resource that won't be reused.
    pub fn ephemeral() -> Self {
        Self::new(1)
    }

    /// Claim an object, constructing one with `make` if the pool is empty.
    pub fn acquire_or(self: &Arc<Self>, make: impl FnOnce() -> T) -> PoolGuard<T> {
        let existing = self.free.lock().pop();
        let value = existing.unwrap_or_else(make);
        PoolGuard {
            pool: Arc::clone(self),
            value: Some(value),
        }
    }

    /// Number of idle objects currently held.
    pub fn idle_len(&self) -> usize {
        self.free.lock().len()
    }
}

/// A claimed pool object; returns itself to the pool when dropped.
pub struct PoolGuard<T> {
    pool: Arc<Pool<T>>,
    value: Option<T>,
}

impl<T> core::ops::Deref for PoolGuard<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.value.as_ref().expect("value taken before drop")
    }
}

impl<T> core::ops::DerefMut for PoolGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("value taken before drop")
    }
}

impl<T> Drop for PoolGuard<T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            let mut free = self.pool.free.lock();
            if free.len() < self.pool.capacity {
                free.push(value);
            }
        }
    }
}

/// A thread-safe, bounded LRU cache keyed on exact header bytes (or any
/// other hashable key), used to amortize repeated header parses/encodings
/// across tokens minted by the same issuer.
///
/// Reads and writes both take the same lock; "lock-free reads" from §5
/// would require a concurrent map this workspace doesn't depend on, so this
/// documents the simplification in `DESIGN.md` rather than pretending.
pub struct HeaderCache<K, V> {
    inner: RwLock<LruCache<K, V>>,
}

impl<K: core::hash::Hash + Eq, V: Clone> HeaderCache<K, V> {
    /// Create a cache with the given capacity (recommended default: 16).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Look up `key`, returning a clone of the cached value if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.write().get(key).cloned()
    }

    /// Insert or refresh a value for `key`.
    pub fn put(&self, key: K, value: V) {
        self.inner.write().put(key, value);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
