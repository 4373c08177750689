use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use jobwatch_engine::{
    FetchFailurePolicy, FetchSettings, SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT,
    DEFAULT_SUBJECT, DEFAULT_USER_AGENT,
};
use jobwatch_logging::LogDestination;
use log::LevelFilter;

const DEFAULT_COMPANIES_FILE: &str = "companies.json";
const DEFAULT_STATE_FILE: &str = "jobs_data.json";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub companies_file: PathBuf,
    pub state_file: PathBuf,
    pub smtp: SmtpSettings,
    pub fetch: FetchSettings,
    pub on_fetch_failure: FetchFailurePolicy,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Config {
    /// Load configuration from environment variables, after a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| var(key).with_context(|| format!("{key} must be set"));

        let from = required("JOBWATCH_MAIL_FROM")?;
        let smtp = SmtpSettings {
            host: var("JOBWATCH_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: match var("JOBWATCH_SMTP_PORT") {
                Some(raw) => raw
                    .trim()
                    .parse::<u16>()
                    .context("JOBWATCH_SMTP_PORT must be a valid port number")?,
                None => DEFAULT_SMTP_PORT,
            },
            username: var("JOBWATCH_SMTP_USERNAME").unwrap_or_else(|| from.clone()),
            password: required("JOBWATCH_SMTP_PASSWORD")?,
            to: required("JOBWATCH_MAIL_TO")?,
            subject: var("JOBWATCH_MAIL_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            from,
        };

        let fetch = FetchSettings {
            user_agent: var("JOBWATCH_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ..FetchSettings::default()
        };

        let on_fetch_failure = match var("JOBWATCH_ON_FETCH_FAILURE") {
            Some(raw) => raw.parse::<FetchFailurePolicy>().map_err(|err| {
                anyhow!("JOBWATCH_ON_FETCH_FAILURE must be `skip` or `abort`: {err}")
            })?,
            None => FetchFailurePolicy::default(),
        };

        let log_destination = match var("JOBWATCH_LOG") {
            Some(raw) => raw.parse::<LogDestination>().map_err(|err| {
                anyhow!("JOBWATCH_LOG must be `terminal`, `file` or `both`: {err}")
            })?,
            None => LogDestination::default(),
        };

        let log_level = match var("JOBWATCH_LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("JOBWATCH_LOG_LEVEL `{raw}` is not a log level"))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            companies_file: var("JOBWATCH_COMPANIES_FILE")
                .unwrap_or_else(|| DEFAULT_COMPANIES_FILE.to_string())
                .into(),
            state_file: var("JOBWATCH_STATE_FILE")
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            smtp,
            fetch,
            on_fetch_failure,
            log_destination,
            log_level,
        })
    }
}
