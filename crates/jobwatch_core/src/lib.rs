//! Jobwatch core: pure data model and new-posting detection.
mod diff;
mod digest;
mod registry;
mod state;

pub use diff::{compute_new_jobs, CurrentScrapes, ScrapeResult};
pub use digest::NewJobsDigest;
pub use registry::CompanyRegistry;
pub use state::KnownJobsState;
