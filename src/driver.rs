//! Sequential pagination over the patient listing.
//!
//! One page is in flight at a time. The run suspends only inside a request,
//! during a retry backoff, and for the pacing delay after each processed page.

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::assess::classify;
use crate::config::{FailurePolicy, Settings};
use crate::error::FetchError;
use crate::fetch::{fetch_with_retry, PageSource, RetryPolicy};
use crate::report::{Incomplete, Report, ReportAggregator};

#[derive(Debug)]
enum State {
    Fetching(u32),
    Done,
    Failed(FetchError),
}

pub struct PaginationDriver<'a, S> {
    source: &'a S,
    settings: &'a Settings,
    retry: RetryPolicy,
}

impl<'a, S: PageSource> PaginationDriver<'a, S> {
    pub fn new(source: &'a S, settings: &'a Settings) -> Self {
        PaginationDriver {
            source,
            settings,
            retry: RetryPolicy::from_settings(settings),
        }
    }

    pub async fn run(self) -> Result<Report, FetchError> {
        let mut report = ReportAggregator::new();
        let mut state = State::Fetching(1);

        loop {
            state = match state {
                State::Fetching(page) => match fetch_with_retry(self.source, page, &self.retry).await {
                    Ok(fetched) => {
                        let count = fetched.records.len();
                        for record in &fetched.records {
                            report.record(&classify(record));
                        }
                        report.page_done();
                        info!(
                            "Page {}: {} records (has_next={})",
                            page, count, fetched.has_next
                        );

                        sleep(self.settings.page_delay()).await;

                        if fetched.has_next {
                            State::Fetching(page + 1)
                        } else {
                            State::Done
                        }
                    }
                    Err(e) => State::Failed(e),
                },
                State::Done => {
                    let report = report.finish(None);
                    info!(
                        "Assessment complete: {} records, {} high risk, {} fever, {} data quality issues",
                        report.records_seen,
                        report.high_risk.len(),
                        report.fever.len(),
                        report.data_quality_issues.len()
                    );
                    return Ok(report);
                }
                State::Failed(err) => match self.settings.failure_policy {
                    FailurePolicy::FailFast => {
                        error!(
                            "Aborting after {} pages, discarding partial results: {}",
                            report.pages_fetched(),
                            err
                        );
                        return Err(err);
                    }
                    FailurePolicy::Partial => {
                        warn!(
                            "Stopping at page {}, returning {} pages of partial results: {}",
                            err.page(),
                            report.pages_fetched(),
                            err
                        );
                        return Ok(report.finish(Some(Incomplete {
                            failed_page: err.page(),
                            reason: err.to_string(),
                        })));
                    }
                },
            };
        }
    }
}

/// Walk every page from `source` and categorize all records.
pub async fn run_assessment<S: PageSource>(
    source: &S,
    settings: &Settings,
) -> Result<Report, FetchError> {
    PaginationDriver::new(source, settings).run().await
}
