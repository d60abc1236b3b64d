use crate::error::Result;
use crate::param::ParamMap;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Memoizes listings by path for the lifetime of the cache.
///
/// There is no invalidation: a listing fetched once stays valid until the
/// cache is dropped. With a capacity set, the oldest inserted path is
/// evicted once the cache grows past it.
#[derive(Debug, Default)]
pub struct ListingCache {
    state: RwLock<CacheState>,
    capacity: Option<usize>,
}

#[derive(Debug, Default)]
struct CacheState {
    map: HashMap<String, Arc<ParamMap>>,
    order: VecDeque<String>,
}

impl CacheState {
    fn insert(&mut self, key: &str, value: Arc<ParamMap>, capacity: Option<usize>) {
        if self.map.insert(key.to_string(), value).is_none() {
            self.order.push_back(key.to_string());
        }
        if let Some(capacity) = capacity {
            while self.order.len() > capacity {
                if let Some(old) = self.order.pop_front() {
                    log::debug!("Evicting cached listing {old}");
                    self.map.remove(&old);
                }
            }
        }
    }
}

impl ListingCache {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity,
        }
    }

    /// Return the listing cached under `key`, or run `fetch` and cache its result.
    ///
    /// The lock is not held while fetching, so two concurrent misses on the
    /// same key both fetch and the later write wins. A failed fetch caches nothing.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Arc<ParamMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ParamMap>>,
    {
        let cached = self.state.read().await.map.get(key).cloned();
        if let Some(hit) = cached {
            log::debug!("Listing cache hit for {key}");
            return Ok(hit);
        }

        let fetched = Arc::new(fetch().await?);
        self.state
            .write()
            .await
            .insert(key, Arc::clone(&fetched), self.capacity);
        Ok(fetched)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.state.read().await.map.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.map.is_empty()
    }
}
