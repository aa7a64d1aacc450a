//! Greenhouse job-page extraction.
//!
//! Parses a job posting page into a [`JobRecord`] using ordered CSS
//! selector chains with per-field fallbacks. Extraction is pure and
//! read-only: the caller supplies the page HTML, the page URL, and the
//! extraction date.

pub mod record;
pub mod strategies;

pub use record::{JobRecord, DEFAULT_STATUS};

use chrono::NaiveDate;
use scraper::Html;
use thiserror::Error;
use url::Url;

use strategies::{first_text, COMPANY_SELECTORS, LOCATION_SELECTORS, TITLE_SELECTORS};

/// Host serving Greenhouse-hosted job boards.
pub const JOB_BOARD_HOST: &str = "boards.greenhouse.io";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// The URL is not on the Greenhouse job board host.
    #[error("Not a Greenhouse job page")]
    NotJobPage,
}

/// True when `url` is on the Greenhouse job board host.
pub fn is_job_page_url(url: &Url) -> bool {
    url.host_str() == Some(JOB_BOARD_HOST)
}

/// Parse a job posting page into a [`JobRecord`].
///
/// `date` becomes `date_applied`; callers stamp the extraction day.
/// `status` and `date_applied` are set unconditionally on every call.
/// Empty `title`/`location` stay empty strings; placeholder text is a
/// display concern, not an extraction one.
pub fn scrape_job_page(html: &str, url: &Url, date: NaiveDate) -> Result<JobRecord, ScrapeError> {
    if !is_job_page_url(url) {
        return Err(ScrapeError::NotJobPage);
    }

    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTORS).unwrap_or_default();
    let company =
        first_text(&document, COMPANY_SELECTORS).unwrap_or_else(|| company_from_url(url));
    let location = first_text(&document, LOCATION_SELECTORS).unwrap_or_default();

    tracing::debug!(url = %url, title = %title, company = %company, "Scraped job page");

    Ok(JobRecord {
        company,
        title,
        location,
        status: DEFAULT_STATUS.to_string(),
        job_url: url.to_string(),
        date_applied: date.format("%Y-%m-%d").to_string(),
    })
}

/// Derive a readable company name from the URL path.
///
/// Boards live at `boards.greenhouse.io/<company>/...`; the slug is
/// split on `-`/`_` and title-cased: `acme-corp` becomes `Acme Corp`.
/// Empty string when the URL has no path segment.
pub fn company_from_url(url: &Url) -> String {
    let slug = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty());

    match slug {
        Some(slug) => slug
            .split(|c| c == '-' || c == '_')
            .filter(|word| !word.is_empty())
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
