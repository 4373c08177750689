use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Job links already reported, per company, in discovery order.
///
/// This is the persisted record. A company without an entry is equivalent to
/// a company with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownJobsState {
    companies: IndexMap<String, Vec<String>>,
}

impl KnownJobsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self, company: &str) -> Option<&[String]> {
        self.companies.get(company).map(Vec::as_slice)
    }

    pub fn contains(&self, company: &str, link: &str) -> bool {
        self.links(company)
            .is_some_and(|links| links.iter().any(|known| known == link))
    }

    pub fn has_company(&self, company: &str) -> bool {
        self.companies.contains_key(company)
    }

    pub fn companies(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.companies
            .iter()
            .map(|(name, links)| (name.as_str(), links.as_slice()))
    }

    /// Number of companies with an entry (including empty ones).
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Total number of known links across all companies.
    pub fn link_count(&self) -> usize {
        self.companies.values().map(Vec::len).sum()
    }

    pub(crate) fn entry_mut(&mut self, company: &str) -> &mut Vec<String> {
        self.companies.entry(company.to_string()).or_default()
    }
}

impl<N, L, S> FromIterator<(N, L)> for KnownJobsState
where
    N: Into<String>,
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, L)>>(iter: I) -> Self {
        let companies = iter
            .into_iter()
            .map(|(name, links)| (name.into(), links.into_iter().map(Into::into).collect()))
            .collect();
        Self { companies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_company_has_no_links() {
        let state = KnownJobsState::new();
        assert_eq!(state.links("Acme"), None);
        assert!(!state.contains("Acme", "/job/1"));
        assert!(!state.has_company("Acme"));
    }

    #[test]
    fn entry_mut_initializes_once() {
        let mut state = KnownJobsState::new();
        state.entry_mut("Acme").push("/job/1".to_string());
        state.entry_mut("Acme");

        assert_eq!(state.links("Acme"), Some(&["/job/1".to_string()][..]));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn serializes_as_company_to_link_list_object() {
        let state: KnownJobsState = [("Acme", vec!["/job/1", "/job/2"]), ("Beta", vec![])]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Acme": ["/job/1", "/job/2"], "Beta": []})
        );
        assert_eq!(state.link_count(), 2);
    }
}
