//! In-memory cache with optional capacity bound.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::{Cache, CacheError};

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}

struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys in insertion order; may hold keys already removed from `entries`.
    order: VecDeque<K>,
}

impl<K, V> Inner<K, V>
where
    K: Hash + Eq + Clone,
{
    fn purge_expired(&mut self, now: Instant) {
        self.entries.retain(|_, e| !e.is_expired(now));
        let entries = &self.entries;
        self.order.retain(|k| entries.contains_key(k));
    }

    fn evict_oldest(&mut self) {
        while let Some(key) = self.order.pop_front() {
            if self.entries.remove(&key).is_some() {
                return;
            }
        }
    }
}

/// In-memory cache backed by a `HashMap`.
///
/// Supports a per-entry TTL and an optional capacity. When full, inserting a new
/// key evicts the oldest inserted entry; overwriting an existing key does not.
///
/// # Example
///
/// ```rust,ignore
/// use classgen::cache::{Cache, InMemoryCache};
///
/// let cache = InMemoryCache::with_capacity(2)?;
/// cache.set("a".to_string(), 1, None).await?;
/// cache.set("b".to_string(), 2, None).await?;
/// cache.set("c".to_string(), 3, None).await?; // evicts "a"
/// assert_eq!(cache.get(&"a".to_string()).await, None);
/// ```
pub struct InMemoryCache<K, V> {
    data: Arc<RwLock<Inner<K, V>>>,
    capacity: Option<usize>,
}

impl<K, V> InMemoryCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded cache.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity: None,
        }
    }

    /// Creates a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        let mut cache = Self::new();
        cache.capacity = Some(capacity);
        Ok(cache)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<K, V> Default for InMemoryCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<K, V> Cache<K, V> for InMemoryCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let data = self.data.read().await;
        data.entries
            .get(key)
            .filter(|e| !e.is_expired(Instant::now()))
            .map(|e| e.value.clone())
    }

    async fn set(&self, key: K, value: V, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = CacheEntry {
            value,
            expires_at: ttl.map(|d| now + d),
        };
        let mut data = self.data.write().await;
        if data.entries.contains_key(&key) {
            data.entries.insert(key, entry);
            return Ok(());
        }
        data.purge_expired(now);
        if let Some(capacity) = self.capacity {
            while data.entries.len() >= capacity && !data.order.is_empty() {
                data.evict_oldest();
            }
        }
        data.order.push_back(key.clone());
        data.entries.insert(key, entry);
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<(), CacheError> {
        let mut data = self.data.write().await;
        data.entries.remove(key);
        data.order.retain(|k| k != key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut data = self.data.write().await;
        data.entries.clear();
        data.order.clear();
        Ok(())
    }

    async fn len(&self) -> usize {
        let now = Instant::now();
        let data = self.data.read().await;
        data.entries.values().filter(|e| !e.is_expired(now)).count()
    }
}
