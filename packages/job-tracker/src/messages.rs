//! Messages exchanged over the bus.
//!
//! Requests and their responses share one enum; responses travel under
//! the request's correlation id. Failure variants carry display strings
//! only; no error type crosses the bus.

use greenhouse_scraper::JobRecord;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerMessage {
    /// Ask the scrape context for the record on `url`.
    Scrape { url: Url },
    Scraped { record: JobRecord },
    ScrapeFailed { error: String },

    /// Ask the sheets context to persist a confirmed record.
    SaveToSheets { record: JobRecord },
    Saved,
    SaveFailed { error: String },
}
