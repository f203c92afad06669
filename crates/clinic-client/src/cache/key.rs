use std::collections::BTreeMap;
use std::fmt;

/// Identity of a cached query: slice, endpoint and normalized arguments.
///
/// Arguments are sorted by name and form-encoded, so the order in which they
/// were supplied never produces a different key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    slice: String,
    endpoint: String,
    params: String,
}

impl CacheKey {
    pub fn new<'a>(
        slice: &str,
        endpoint: &str,
        args: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let sorted: BTreeMap<&str, &str> = args.into_iter().collect();
        let params = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted)
            .finish();
        Self {
            slice: slice.to_string(),
            endpoint: endpoint.to_string(),
            params,
        }
    }

    pub fn slice(&self) -> &str {
        &self.slice
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Serialized arguments, empty when the query takes none
    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}({})", self.slice, self.endpoint, self.params)
    }
}
