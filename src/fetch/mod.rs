pub mod http;
pub mod retry;

use std::future::Future;

use serde_json::Value;

use crate::error::AttemptError;

pub use http::HttpPageSource;
pub use retry::{fetch_with_retry, RetryPolicy};

/// One batch of raw records plus the continuation flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Value>,
    pub has_next: bool,
}

impl Page {
    /// Lenient decode of `{ data: [...], pagination: { hasNext } }`. A missing
    /// or non-array `data` is an empty page; a missing flag ends pagination.
    pub fn from_body(body: Value) -> Page {
        let Value::Object(mut body) = body else {
            return Page::default();
        };
        let has_next = body
            .get("pagination")
            .and_then(|p| p.get("hasNext"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let records = match body.remove("data") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        };
        Page { records, has_next }
    }
}

/// Anything that can produce page `n` of the patient listing with one request.
pub trait PageSource {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page, AttemptError>> + Send;
}
