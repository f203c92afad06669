//! Query result cache with tag-based invalidation.
//!
//! This module holds the bookkeeping behind every slice query. It is a plain
//! state machine with no I/O: the store owns one instance and drives it from
//! its mailbox, so every transition is serialized.
//!
//! ## Design
//!
//! - **Cache Key**: slice, endpoint and normalized arguments ([`CacheKey`])
//! - **Deduplication**: a key that is already loading is joined instead of
//!   requested again ([`Lookup::Pending`])
//! - **Ordering**: request ids are monotonic; a response is applied only if its
//!   id is the latest issued for the key, so a slow older response can never
//!   overwrite a newer one
//! - **Invalidation**: entries carrying an invalidated tag become stale;
//!   subscribed keys are returned for an immediate refetch, the rest wait for
//!   their next query
//! - **Eviction**: none besides [`QueryCache::clear`]
//!
//! ## Entry lifecycle
//!
//! ```text
//! uninitialized ──begin──▶ loading ──fulfill──▶ success
//!                              │                  │
//!                              └────reject──▶ error
//! success/error ──invalidate──▶ loading (subscribed, refetch)
//!                           └─▶ uninitialized + stale (unsubscribed)
//! ```

mod entry;
mod key;

pub use entry::{CacheEntry, QueryResult, QueryStatus, RequestId};
pub use key::CacheKey;

use std::collections::HashMap;

use clinic_core::Tag;
use serde_json::Value;
use time::OffsetDateTime;

/// Outcome of asking the cache for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Cached data can be served as-is
    Fresh(CacheEntry),
    /// A request for this key is already in flight; wait for it
    Pending,
    /// Issue a request tagged with this id
    Fetch(RequestId),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, CacheEntry>,
    subscribers: HashMap<CacheKey, usize>,
    next_request: RequestId,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Current entry, or an uninitialized one when the key was never queried
    pub fn snapshot(&self, key: &CacheKey) -> CacheEntry {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| CacheEntry::uninitialized(key.clone()))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide how to answer a query. `force` skips both the fresh-data and the
    /// in-flight shortcuts and always issues a new request.
    pub fn begin(&mut self, key: &CacheKey, tags: &[Tag], force: bool) -> Lookup {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::uninitialized(key.clone()));

        if !force {
            if entry.is_fresh() {
                return Lookup::Fresh(entry.clone());
            }
            // A stale in-flight request predates an invalidation and is not joined
            if entry.is_loading() && !entry.stale {
                return Lookup::Pending;
            }
        }

        self.next_request += 1;
        let request = self.next_request;
        entry.status = QueryStatus::Loading;
        entry.stale = false;
        entry.tags = tags.iter().copied().collect();
        entry.latest_request = Some(request);
        Lookup::Fetch(request)
    }

    /// Store a successful response. Returns `None` when `request` has been
    /// superseded or the entry was cleared meanwhile.
    pub fn fulfill(
        &mut self,
        key: &CacheKey,
        request: RequestId,
        data: Value,
        tags: &[Tag],
    ) -> Option<&CacheEntry> {
        let entry = self.current(key, request)?;
        entry.status = QueryStatus::Success;
        entry.data = Some(data);
        entry.error = None;
        entry.tags = tags.iter().copied().collect();
        entry.last_fetched_at = Some(OffsetDateTime::now_utc());
        Some(&*entry)
    }

    /// Store a failure, keeping whatever data the entry already had.
    pub fn reject(
        &mut self,
        key: &CacheKey,
        request: RequestId,
        message: String,
    ) -> Option<&CacheEntry> {
        let entry = self.current(key, request)?;
        entry.status = QueryStatus::Error;
        entry.error = Some(message);
        entry.last_fetched_at = Some(OffsetDateTime::now_utc());
        Some(&*entry)
    }

    fn current(&mut self, key: &CacheKey, request: RequestId) -> Option<&mut CacheEntry> {
        self.entries
            .get_mut(key)
            .filter(|entry| entry.latest_request == Some(request))
    }

    /// Mark every entry tagged with one of `tags` stale. Returns the subscribed
    /// keys, which the caller must refetch now.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<CacheKey> {
        let mut refetch = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if !entry.has_tag(tags) {
                continue;
            }
            entry.stale = true;
            if self.subscribers.get(key).copied().unwrap_or(0) > 0 {
                refetch.push(key.clone());
            } else if !entry.is_loading() {
                entry.status = QueryStatus::Uninitialized;
            }
        }
        refetch.sort();
        refetch
    }

    pub fn subscribe(&mut self, key: &CacheKey) -> usize {
        let count = self.subscribers.entry(key.clone()).or_default();
        *count += 1;
        *count
    }

    /// Returns the number of subscribers left on `key`
    pub fn unsubscribe(&mut self, key: &CacheKey) -> usize {
        let Some(count) = self.subscribers.get_mut(key) else {
            return 0;
        };
        *count = count.saturating_sub(1);
        let left = *count;
        if left == 0 {
            self.subscribers.remove(key);
        }
        left
    }

    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        self.subscribers.get(key).copied().unwrap_or(0)
    }

    /// Drop every entry. Subscriptions stay registered. Responses of requests
    /// issued before the purge no longer match any entry and are discarded.
    pub fn clear(&mut self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.entries.drain().map(|(key, _)| key).collect();
        keys.sort();
        keys
    }
}
