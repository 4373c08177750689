use indexmap::IndexMap;

/// Links judged new in the current run, grouped by company in registry order.
///
/// Only companies with at least one new link have an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewJobsDigest {
    companies: IndexMap<String, Vec<String>>,
}

impl NewJobsDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn link_count(&self) -> usize {
        self.companies.values().map(Vec::len).sum()
    }

    pub fn links(&self, company: &str) -> Option<&[String]> {
        self.companies.get(company).map(Vec::as_slice)
    }

    pub fn companies(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.companies
            .iter()
            .map(|(name, links)| (name.as_str(), links.as_slice()))
    }

    /// Flattened `(company, link)` pairs in digest order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.companies().flat_map(|(company, links)| {
            links.iter().map(move |link| (company, link.as_str()))
        })
    }

    pub(crate) fn record(&mut self, company: &str, links: Vec<String>) {
        if links.is_empty() {
            return;
        }
        self.companies
            .entry(company.to_string())
            .or_default()
            .extend(links);
    }
}

impl<N, L, S> FromIterator<(N, L)> for NewJobsDigest
where
    N: Into<String>,
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, L)>>(iter: I) -> Self {
        let mut digest = Self::new();
        for (name, links) in iter {
            let name = name.into();
            digest.record(&name, links.into_iter().map(Into::into).collect());
        }
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_link_lists_are_not_recorded() {
        let mut digest = NewJobsDigest::new();
        digest.record("Acme", Vec::new());
        assert!(digest.is_empty());
    }

    #[test]
    fn entries_flatten_in_order() {
        let digest: NewJobsDigest = [
            ("Acme", vec!["/job/1", "/job/2"]),
            ("Beta", vec!["/jobs/x"]),
        ]
        .into_iter()
        .collect();

        let entries: Vec<_> = digest.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("Acme", "/job/1"),
                ("Acme", "/job/2"),
                ("Beta", "/jobs/x"),
            ]
        );
        assert_eq!(digest.company_count(), 2);
        assert_eq!(digest.link_count(), 3);
    }
}
