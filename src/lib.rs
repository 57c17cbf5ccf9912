//! Paginated patient vitals retrieval and risk triage.
//!
//! Pages are pulled one at a time from the upstream listing with bounded
//! retries, every record is validated and scored, and the results are folded
//! into a three-category [`Report`].

pub mod assess;
pub mod config;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod report;

pub use config::{FailurePolicy, Settings};
pub use driver::{run_assessment, PaginationDriver};
pub use error::{AttemptError, ConfigError, FetchError};
pub use fetch::{HttpPageSource, Page, PageSource};
pub use report::Report;
