//! Bus-facing contexts, one handler per responsibility.
//!
//! Handlers convert their own failures into failure responses; nothing
//! escapes a handler as an error or a panic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use greenhouse_scraper::{scrape_job_page, JobRecord};
use sheets_client::{SheetsClient, SheetsError};
use switchboard::Handler;

use crate::auth::TokenProvider;
use crate::fetch::PageFetcher;
use crate::messages::TrackerMessage;

/// Fixed column order for the applications sheet (columns A:F):
/// date, company, title, location, status, URL.
pub fn record_row(record: &JobRecord) -> Vec<String> {
    vec![
        record.date_applied.clone(),
        record.company.clone(),
        record.title.clone(),
        record.location.clone(),
        record.status.clone(),
        record.job_url.clone(),
    ]
}

/// Answers `Scrape` requests: fetch the page, parse it, report the
/// record or a single error string.
pub struct ScrapeHandler<F> {
    fetcher: F,
}

impl<F: PageFetcher> ScrapeHandler<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    async fn scrape(&self, url: &Url) -> Result<JobRecord, String> {
        let html = self.fetcher.fetch(url).await.map_err(|e| e.to_string())?;
        let today = Utc::now().date_naive();
        scrape_job_page(&html, url, today).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl<F: PageFetcher + 'static> Handler<TrackerMessage> for ScrapeHandler<F> {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn handle(&self, message: &TrackerMessage) -> Option<Vec<TrackerMessage>> {
        match message {
            TrackerMessage::Scrape { url } => {
                let response = match self.scrape(url).await {
                    Ok(record) => {
                        tracing::info!(url = %url, company = %record.company, "Scraped job posting");
                        TrackerMessage::Scraped { record }
                    }
                    Err(error) => {
                        tracing::warn!(url = %url, error = %error, "Scrape failed");
                        TrackerMessage::ScrapeFailed { error }
                    }
                };
                Some(vec![response])
            }
            _ => None,
        }
    }
}

/// Append seam over the sheets client so tests can stand in for the API.
#[async_trait]
pub trait AppendTarget: Send + Sync {
    async fn append_row(&self, token: &str, row: Vec<String>) -> Result<(), SheetsError>;
}

#[async_trait]
impl AppendTarget for SheetsClient {
    async fn append_row(&self, token: &str, row: Vec<String>) -> Result<(), SheetsError> {
        SheetsClient::append_row(self, token, row).await
    }
}

#[async_trait]
impl<T: AppendTarget + ?Sized> AppendTarget for Arc<T> {
    async fn append_row(&self, token: &str, row: Vec<String>) -> Result<(), SheetsError> {
        (**self).append_row(token, row).await
    }
}

/// Answers `SaveToSheets` requests: acquire a credential, build the row,
/// append it. One network write per request, no retries.
pub struct SheetsHandler<T> {
    tokens: Arc<dyn TokenProvider>,
    sheets: T,
}

impl<T: AppendTarget> SheetsHandler<T> {
    pub fn new(tokens: Arc<dyn TokenProvider>, sheets: T) -> Self {
        Self { tokens, sheets }
    }

    async fn save(&self, record: &JobRecord) -> Result<(), String> {
        let token = self.tokens.acquire(true).await.map_err(|e| e.to_string())?;

        match self.sheets.append_row(token.secret(), record_row(record)).await {
            Ok(()) => Ok(()),
            Err(error) => {
                if let SheetsError::Api { status: 401, .. } = error {
                    // The API stopped accepting the token; drop it so a
                    // user-initiated retry re-acquires interactively.
                    self.tokens.invalidate().await;
                }
                Err(error.to_string())
            }
        }
    }
}

#[async_trait]
impl<T: AppendTarget + 'static> Handler<TrackerMessage> for SheetsHandler<T> {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn handle(&self, message: &TrackerMessage) -> Option<Vec<TrackerMessage>> {
        match message {
            TrackerMessage::SaveToSheets { record } => {
                let response = match self.save(record).await {
                    Ok(()) => {
                        tracing::info!(url = %record.job_url, "Saved application");
                        TrackerMessage::Saved
                    }
                    Err(error) => {
                        tracing::warn!(url = %record.job_url, error = %error, "Save failed");
                        TrackerMessage::SaveFailed { error }
                    }
                };
                Some(vec![response])
            }
            _ => None,
        }
    }
}
