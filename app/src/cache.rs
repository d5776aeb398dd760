use moka::future::Cache;
use std::time::Duration;

/// Keyed response cache whose entries expire a fixed interval after insert.
/// A zero TTL or zero capacity turns the cache off.
pub struct TtlCache<V> {
    ttl: Duration,
    inner: Option<Cache<String, V>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let inner = (!ttl.is_zero() && max_capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build()
        });

        Self { ttl, inner }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.as_ref()?.get(key).await
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        if let Some(cache) = &self.inner {
            cache.insert(key.into(), value).await;
        }
    }

    /// Live entry count after pending evictions have been applied.
    pub async fn len(&self) -> u64 {
        match &self.inner {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
