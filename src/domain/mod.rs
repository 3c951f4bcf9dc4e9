//! Domain primitives shared by the search engine and its collaborators.

pub mod events;

pub use events::SearchInput;

use serde::Serialize;
use std::fmt;

/// Sequence number minted each time a search is triggered.
///
/// Tokens only ever grow. A response is applied only when its token is still
/// the latest one minted by the controller.
///
/// # Examples
///
/// ```rust
/// use recetario::domain::SearchRequestToken;
///
/// let first = SearchRequestToken::default();
/// let second = first.next();
/// assert!(second > first);
/// assert_eq!(second.value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SearchRequestToken(u64);

impl SearchRequestToken {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SearchRequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered key/value query parameters for the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.0.push((key.to_string(), value.into()));
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.iter());
        f.write_str(&serializer.finish())
    }
}
