use std::str::FromStr;

use jobwatch_core::{compute_new_jobs, CompanyRegistry, CurrentScrapes, ScrapeResult};
use jobwatch_logging::{watch_debug, watch_info, watch_warn};
use thiserror::Error;

use crate::decode::decode_html;
use crate::fetch::Fetcher;
use crate::links::JobLinkExtractor;
use crate::notify::{NotifyError, Notifier};
use crate::store::{StateStore, StoreError};
use crate::FetchError;

/// What to do when one company's page cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Log the failure, leave the company out of this run, continue.
    #[default]
    Skip,
    /// Abort the whole run before anything is sent or saved.
    Abort,
}

impl FromStr for FetchFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" | "isolate" => Ok(Self::Skip),
            "abort" | "fail" => Ok(Self::Abort),
            other => Err(format!("unknown fetch failure policy `{other}`")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to load known jobs: {0}")]
    LoadState(#[source] StoreError),
    #[error("scraping {company} ({url}) failed: {source}")]
    Scrape {
        company: String,
        url: String,
        #[source]
        source: ScrapeError,
    },
    #[error("failed to send notification: {0}")]
    Notify(#[from] NotifyError),
    #[error("failed to save known jobs: {0}")]
    SaveState(#[source] StoreError),
}

/// A company skipped under [`FetchFailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFailure {
    pub company: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    NoNewJobs,
    Notified { companies: usize, links: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Companies whose page was fetched and scanned.
    pub checked_companies: usize,
    pub failed_companies: Vec<CompanyFailure>,
}

impl RunReport {
    /// True when companies were configured but none of them could be checked.
    pub fn nothing_checked(&self) -> bool {
        self.checked_companies == 0 && !self.failed_companies.is_empty()
    }
}

/// Runs one watch pass: load state, scrape, diff, notify, save.
///
/// State is saved only after the notification went out, so a failed send
/// leaves the new links unreported and unknown for the next run.
pub struct Orchestrator<F, N, S> {
    fetcher: F,
    notifier: N,
    store: S,
    extractor: JobLinkExtractor,
    policy: FetchFailurePolicy,
}

impl<F, N, S> Orchestrator<F, N, S>
where
    F: Fetcher,
    N: Notifier,
    S: StateStore,
{
    pub fn new(fetcher: F, notifier: N, store: S) -> Self {
        Self {
            fetcher,
            notifier,
            store,
            extractor: JobLinkExtractor::new(),
            policy: FetchFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_extractor(mut self, extractor: JobLinkExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one page and pull its job links.
    pub async fn scrape(&self, url: &str) -> Result<ScrapeResult, ScrapeError> {
        let output = self.fetcher.fetch(url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_errors {
            watch_warn!(
                "{} has malformed {} bytes; replaced them and kept scanning",
                url,
                decoded.encoding_label
            );
        }
        Ok(self.extractor.extract(&decoded.html))
    }

    pub async fn run_once(&self, registry: &CompanyRegistry) -> Result<RunReport, RunError> {
        let known = self.store.load().map_err(RunError::LoadState)?;

        let mut scrapes = CurrentScrapes::with_capacity(registry.len());
        let mut checked_companies = 0;
        let mut failed_companies = Vec::new();
        for (company, url) in registry.iter() {
            match self.scrape(url).await {
                Ok(links) => {
                    watch_debug!("{}: {} job links at {}", company, links.len(), url);
                    scrapes.insert(company.to_string(), links);
                    checked_companies += 1;
                }
                Err(source) => match self.policy {
                    FetchFailurePolicy::Abort => {
                        return Err(RunError::Scrape {
                            company: company.to_string(),
                            url: url.to_string(),
                            source,
                        });
                    }
                    FetchFailurePolicy::Skip => {
                        watch_warn!("Skipping {} ({}): {}", company, url, source);
                        failed_companies.push(CompanyFailure {
                            company: company.to_string(),
                            url: url.to_string(),
                            reason: source.to_string(),
                        });
                    }
                },
            }
        }

        let (digest, updated) = compute_new_jobs(registry, &scrapes, known);
        if digest.is_empty() {
            watch_info!("No new jobs across {} companies", registry.len());
            return Ok(RunReport {
                outcome: RunOutcome::NoNewJobs,
                checked_companies,
                failed_companies,
            });
        }

        watch_info!(
            "Found {} new jobs at {} companies",
            digest.link_count(),
            digest.company_count()
        );
        self.notifier.notify(&digest).await?;
        self.store.save(&updated).map_err(RunError::SaveState)?;

        Ok(RunReport {
            outcome: RunOutcome::Notified {
                companies: digest.company_count(),
                links: digest.link_count(),
            },
            checked_companies,
            failed_companies,
        })
    }
}
