mod config;

use std::path::Path;

use anyhow::{bail, Context, Result};
use jobwatch_engine::{
    load_registry, JsonFileStateStore, Orchestrator, ReqwestFetcher, RunOutcome, SmtpNotifier,
};
use jobwatch_logging::{watch_info, watch_warn, DEFAULT_LOG_FILE};

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    jobwatch_logging::initialize(
        config.log_destination,
        config.log_level,
        Path::new(DEFAULT_LOG_FILE),
    );
    watch_info!(
        "Watching companies from {:?}, state in {:?}",
        config.companies_file,
        config.state_file
    );

    let registry = load_registry(&config.companies_file)?;
    let fetcher = ReqwestFetcher::new(config.fetch.clone()).context("Failed to build HTTP client")?;
    let notifier = SmtpNotifier::new(config.smtp.clone());
    let store = JsonFileStateStore::new(config.state_file.clone());

    let orchestrator =
        Orchestrator::new(fetcher, notifier, store).with_policy(config.on_fetch_failure);
    let report = orchestrator.run_once(&registry).await?;

    if !report.failed_companies.is_empty() {
        let names: Vec<_> = report
            .failed_companies
            .iter()
            .map(|failure| failure.company.as_str())
            .collect();
        watch_warn!(
            "{} companies could not be checked: {}",
            names.len(),
            names.join(", ")
        );
    }

    if report.nothing_checked() {
        bail!(
            "None of the {} companies could be checked",
            report.failed_companies.len()
        );
    }

    match report.outcome {
        RunOutcome::Notified { .. } => println!("New jobs found and emailed!"),
        RunOutcome::NoNewJobs => println!("No new jobs found."),
    }
    Ok(())
}
