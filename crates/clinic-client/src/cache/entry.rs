use std::collections::BTreeSet;
use std::fmt;

use clinic_core::Tag;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;

use super::CacheKey;
use crate::error::Result;

/// Monotonic id of an issued request. Only the latest id of a key may settle it.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    Uninitialized,
    Loading,
    Success,
    Error,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Last known result of one query key.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Most recent successful body; kept across errors and invalidation
    pub data: Option<Value>,
    pub error: Option<String>,
    pub status: QueryStatus,
    pub tags: BTreeSet<Tag>,
    pub last_fetched_at: Option<OffsetDateTime>,
    /// Set by invalidation; cleared when a new request is issued
    pub stale: bool,
    pub(crate) latest_request: Option<RequestId>,
}

impl CacheEntry {
    pub fn uninitialized(key: CacheKey) -> Self {
        Self {
            key,
            data: None,
            error: None,
            status: QueryStatus::Uninitialized,
            tags: BTreeSet::new(),
            last_fetched_at: None,
            stale: false,
            latest_request: None,
        }
    }

    /// Servable without a network round trip
    pub fn is_fresh(&self) -> bool {
        self.status == QueryStatus::Success && !self.stale
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn has_tag(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    /// Decode the cached body into a typed record. An empty body decodes to `None`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.data {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }
}

/// Typed view of a [`CacheEntry`] handed to callers of a slice query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_stale: bool,
}

impl<T: DeserializeOwned> QueryResult<T> {
    pub fn from_entry(entry: &CacheEntry) -> Result<Self> {
        Ok(Self {
            status: entry.status,
            data: entry.decode()?,
            error: entry.error.clone(),
            is_stale: entry.stale,
        })
    }
}

impl<T> QueryResult<T> {
    /// Result of a query whose required arguments are missing
    pub fn skipped() -> Self {
        Self {
            status: QueryStatus::Uninitialized,
            data: None,
            error: None,
            is_stale: false,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            status: self.status,
            data: self.data.map(f),
            error: self.error,
            is_stale: self.is_stale,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_uninitialized(&self) -> bool {
        self.status == QueryStatus::Uninitialized
    }

    /// Data of a successful query, or the stored error message
    pub fn into_data(self) -> std::result::Result<Option<T>, String> {
        match self.status {
            QueryStatus::Error => Err(self
                .error
                .unwrap_or_else(|| "Request failed".to_string())),
            _ => Ok(self.data),
        }
    }
}
