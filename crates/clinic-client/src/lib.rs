//! Client for the clinic booking backend.
//!
//! A single [`Store`] task owns the authenticated [`Session`] and a tag-aware
//! [`QueryCache`](cache::QueryCache). Resource slices describe their queries and
//! mutations declaratively and route them through the store, which deduplicates
//! requests, keeps the newest response per query and refetches subscribed
//! queries after a mutation invalidates them.

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod session;
pub mod slices;
pub mod storage;
pub mod store;

pub use cache::{CacheEntry, CacheKey, QueryResult, QueryStatus};
pub use client::ClinicClient;
pub use crate::config::{ClientConfig, load_config};
pub use endpoint::{MutationDef, QueryDef};
pub use error::{ClientError, Result};
pub use http::ApiClient;
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{Action, AppState, QuerySubscription, Store, StoreEvent};
