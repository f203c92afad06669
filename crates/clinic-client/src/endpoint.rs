//! Declarative descriptions of slice operations.

use clinic_core::Tag;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::cache::CacheKey;
use crate::error::Result;

/// Post-processing applied to a query body before it is cached
pub type Transform = fn(Value) -> Value;

/// `base` followed by `id` as one percent-encoded path segment. `None` for
/// `.` and `..`, which URL parsing resolves away whatever the encoding.
pub fn resource_path(base: &str, id: &str) -> Option<String> {
    if matches!(id, "." | "..") {
        return None;
    }
    // byte_serialize writes spaces as '+', which a path would take literally
    let segment = form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    Some(format!("{base}/{segment}"))
}

/// A cacheable GET operation of one slice.
#[derive(Debug, Clone)]
pub struct QueryDef {
    slice: &'static str,
    endpoint: &'static str,
    path: String,
    args: Vec<(String, String)>,
    query: Vec<(String, String)>,
    provides: Vec<Tag>,
    authenticated: bool,
    transform: Option<Transform>,
}

impl QueryDef {
    pub fn new(slice: &'static str, endpoint: &'static str, path: impl Into<String>) -> Self {
        Self {
            slice,
            endpoint,
            path: path.into(),
            args: Vec::new(),
            query: Vec::new(),
            provides: Vec::new(),
            authenticated: false,
            transform: None,
        }
    }

    /// Argument already interpolated into the path; only feeds the cache key
    pub fn path_arg(mut self, name: &str, value: &str) -> Self {
        self.args.push((name.to_string(), value.to_string()));
        self
    }

    /// Argument sent as a query-string parameter
    pub fn query_arg(mut self, name: &str, value: &str) -> Self {
        self.args.push((name.to_string(), value.to_string()));
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn provides(mut self, tags: &[Tag]) -> Self {
        self.provides = tags.to_vec();
        self
    }

    /// Send the session's bearer token with this request
    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::new(
            self.slice,
            self.endpoint,
            self.args.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn tags(&self) -> &[Tag] {
        &self.provides
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub(crate) fn apply(&self, value: Value) -> Value {
        match self.transform {
            Some(transform) => transform(value),
            None => value,
        }
    }
}

/// A state-changing operation. Never cached.
#[derive(Debug, Clone)]
pub struct MutationDef {
    slice: &'static str,
    endpoint: &'static str,
    method: Method,
    path: String,
    body: Value,
    invalidates: Vec<Tag>,
    authenticated: bool,
}

impl MutationDef {
    pub fn new(
        slice: &'static str,
        endpoint: &'static str,
        method: Method,
        path: impl Into<String>,
        body: Value,
    ) -> Self {
        Self {
            slice,
            endpoint,
            method,
            path: path.into(),
            body,
            invalidates: Vec::new(),
            authenticated: false,
        }
    }

    pub fn post<B: Serialize + ?Sized>(
        slice: &'static str,
        endpoint: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self> {
        Ok(Self::new(
            slice,
            endpoint,
            Method::POST,
            path,
            serde_json::to_value(body)?,
        ))
    }

    pub fn invalidates(mut self, tags: &[Tag]) -> Self {
        self.invalidates = tags.to_vec();
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.slice, self.endpoint)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn invalidated_tags(&self) -> &[Tag] {
        &self.invalidates
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
