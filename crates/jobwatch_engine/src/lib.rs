//! Jobwatch engine: page fetching, link extraction, persistence, mail and the run loop.
mod decode;
mod fetch;
mod links;
mod notify;
mod orchestrator;
mod persist;
mod registry;
mod store;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use links::{JobLinkExtractor, DEFAULT_JOB_MARKER};
pub use notify::{
    format_digest_body, Notifier, NotifyError, SmtpNotifier, SmtpSettings, DEFAULT_SMTP_HOST,
    DEFAULT_SMTP_PORT, DEFAULT_SUBJECT,
};
pub use orchestrator::{
    CompanyFailure, FetchFailurePolicy, Orchestrator, RunError, RunOutcome, RunReport,
    ScrapeError,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use registry::{load_registry, RegistryError};
pub use store::{JsonFileStateStore, MemoryStateStore, StateStore, StoreError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
