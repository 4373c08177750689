use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Companies to watch, keyed by name, in the order they were configured.
///
/// Serialized as a plain JSON object (`{"Acme": "https://acme.example/careers"}`);
/// the object key order is the iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyRegistry {
    companies: IndexMap<String, String>,
}

impl CompanyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a company. A replaced company keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.companies.insert(name.into(), url.into())
    }

    pub fn url(&self, name: &str) -> Option<&str> {
        self.companies.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.companies
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.companies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl<N, U> FromIterator<(N, U)> for CompanyRegistry
where
    N: Into<String>,
    U: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (name, url) in iter {
            registry.insert(name, url);
        }
        registry
    }
}
