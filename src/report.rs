use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assess::Classification;

/// Set when a run stopped early under the partial-results policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incomplete {
    pub failed_page: u32,
    pub reason: String,
}

/// Final categorized result of a run. Lists keep fetch order and are not
/// deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(rename = "high_risk_patients")]
    pub high_risk: Vec<String>,
    #[serde(rename = "fever_patients")]
    pub fever: Vec<String>,
    pub data_quality_issues: Vec<String>,
    pub pages_fetched: u32,
    pub records_seen: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete: Option<Incomplete>,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }

    pub fn print(&self) {
        print_category("High risk (score >= 4)", &self.high_risk);
        print_category("Fever (>= 99.6 F)", &self.fever);
        print_category("Data quality issues", &self.data_quality_issues);
        println!(
            "\n{} records across {} pages",
            self.records_seen, self.pages_fetched
        );
        if let Some(inc) = &self.incomplete {
            println!(
                "INCOMPLETE: stopped at page {} ({})",
                inc.failed_page, inc.reason
            );
        }
    }
}

fn print_category(title: &str, ids: &[String]) {
    println!("{} [{}]", title, ids.len());
    if ids.is_empty() {
        println!("  -");
    } else {
        println!("  {}", ids.join(", "));
    }
}

/// Accumulates classifications page by page. Owned by the driver until
/// `finish` hands the report over.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    high_risk: Vec<String>,
    fever: Vec<String>,
    data_quality_issues: Vec<String>,
    pages_fetched: u32,
    records_seen: usize,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, c: &Classification) {
        self.records_seen += 1;
        if c.has_quality_issue() {
            self.data_quality_issues.push(c.patient_id.clone());
        } else if c.is_high_risk() {
            self.high_risk.push(c.patient_id.clone());
        }
        if c.fever {
            self.fever.push(c.patient_id.clone());
        }
    }

    pub fn page_done(&mut self) {
        self.pages_fetched += 1;
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn finish(self, incomplete: Option<Incomplete>) -> Report {
        Report {
            high_risk: self.high_risk,
            fever: self.fever,
            data_quality_issues: self.data_quality_issues,
            pages_fetched: self.pages_fetched,
            records_seen: self.records_seen,
            generated_at: Utc::now(),
            incomplete,
        }
    }
}
