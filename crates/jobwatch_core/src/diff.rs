use std::collections::{HashMap, HashSet};

use crate::{CompanyRegistry, KnownJobsState, NewJobsDigest};

/// Job links extracted from one company's page in one run, in page order.
pub type ScrapeResult = Vec<String>;

/// Scrape results for the current run, keyed by company name.
pub type CurrentScrapes = HashMap<String, ScrapeResult>;

/// Pure diff: splits the current scrapes into new links and records them as known.
///
/// Companies are visited in registry order. Every registry company ends up with
/// an entry in the returned state, even when nothing new was found. A company
/// with no scrape in `current` is handled like an empty scrape.
///
/// A link repeated within one scrape is reported (and appended) once per
/// occurrence; only links known before this call are filtered out.
pub fn compute_new_jobs(
    registry: &CompanyRegistry,
    current: &CurrentScrapes,
    mut known: KnownJobsState,
) -> (NewJobsDigest, KnownJobsState) {
    let mut digest = NewJobsDigest::new();

    for company in registry.names() {
        let seen = known.entry_mut(company);
        let scraped = current.get(company).map(Vec::as_slice).unwrap_or_default();

        let fresh: Vec<String> = {
            let seen_set: HashSet<&str> = seen.iter().map(String::as_str).collect();
            scraped
                .iter()
                .filter(|link| !seen_set.contains(link.as_str()))
                .cloned()
                .collect()
        };

        if fresh.is_empty() {
            continue;
        }
        seen.extend(fresh.iter().cloned());
        digest.record(company, fresh);
    }

    (digest, known)
}
