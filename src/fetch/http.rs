use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{Page, PageSource};
use crate::config::Settings;
use crate::error::AttemptError;

const API_KEY_HEADER: &str = "x-api-key";

/// The patient listing endpoint, one GET per page.
pub struct HttpPageSource {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl HttpPageSource {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: &Settings) -> Self {
        HttpPageSource {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            page_size: settings.page_size,
        }
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> Result<Page, AttemptError> {
        debug!("GET {} page={} limit={}", self.base_url, page, self.page_size);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page), ("limit", self.page_size)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        Ok(Page::from_body(value))
    }
}
