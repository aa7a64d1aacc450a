//! End-to-end bus round-trips with the real handlers and mocked seams:
//! the page fetcher, the credential provider, and the append target.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use job_tracker::auth::{AccessToken, AuthError, TokenProvider};
use job_tracker::fetch::{FetchError, PageFetcher};
use job_tracker::handlers::{AppendTarget, ScrapeHandler, SheetsHandler};
use job_tracker::machine::{RecordEdits, SessionAction, SessionInput, SessionMachine};
use job_tracker::messages::TrackerMessage;
use greenhouse_scraper::JobRecord;
use sheets_client::SheetsError;
use switchboard::{request_timeout, serve, Machine, MessageBus, RequestError};

const TIMEOUT: Duration = Duration::from_secs(5);

const JOB_PAGE: &str = r#"<html><body>
    <h1 class="app-title">Senior Engineer</h1>
    <span class="company-name">Acme</span>
    <div class="location">Remote</div>
</body></html>"#;

fn job_url() -> Url {
    Url::parse("https://boards.greenhouse.io/acme/jobs/1").unwrap()
}

struct FixtureFetcher {
    html: &'static str,
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        Ok(self.html.to_string())
    }
}

struct UnreachableFetcher;

#[async_trait]
impl PageFetcher for UnreachableFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        Err(FetchError::Status {
            status: 500,
            url: url.to_string(),
        })
    }
}

struct StaticTokens;

#[async_trait]
impl TokenProvider for StaticTokens {
    async fn acquire(&self, _interactive: bool) -> Result<AccessToken, AuthError> {
        Ok(AccessToken::new("test-token"))
    }

    async fn invalidate(&self) {}
}

struct DeniedTokens;

#[async_trait]
impl TokenProvider for DeniedTokens {
    async fn acquire(&self, _interactive: bool) -> Result<AccessToken, AuthError> {
        Err(AuthError::Denied)
    }

    async fn invalidate(&self) {}
}

/// Records appended rows; fails the next append when primed.
#[derive(Default)]
struct RecordingSheet {
    rows: Mutex<Vec<Vec<String>>>,
    fail_next: Mutex<Option<SheetsError>>,
}

#[async_trait]
impl AppendTarget for RecordingSheet {
    async fn append_row(&self, _token: &str, row: Vec<String>) -> Result<(), SheetsError> {
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}

async fn scrape(bus: &MessageBus<TrackerMessage>, url: Url) -> Result<JobRecord, String> {
    request_timeout(bus, TrackerMessage::Scrape { url }, TIMEOUT, |m| match m {
        TrackerMessage::Scraped { record } => Some(Ok(record.clone())),
        TrackerMessage::ScrapeFailed { error } => Some(Err(error.clone())),
        _ => None,
    })
    .await
    .expect("transport")
}

async fn save(bus: &MessageBus<TrackerMessage>, record: JobRecord) -> Result<(), String> {
    request_timeout(
        bus,
        TrackerMessage::SaveToSheets { record },
        TIMEOUT,
        |m| match m {
            TrackerMessage::Saved => Some(Ok(())),
            TrackerMessage::SaveFailed { error } => Some(Err(error.clone())),
            _ => None,
        },
    )
    .await
    .expect("transport")
}

#[tokio::test]
async fn scrape_review_save_round_trip() {
    let bus = MessageBus::new();
    serve(&bus, ScrapeHandler::new(FixtureFetcher { html: JOB_PAGE }));

    let sheet = Arc::new(RecordingSheet::default());
    serve(
        &bus,
        SheetsHandler::new(Arc::new(StaticTokens), sheet.clone()),
    );

    // Scrape.
    let record = scrape(&bus, job_url()).await.unwrap();
    assert_eq!(record.company, "Acme");
    assert_eq!(record.title, "Senior Engineer");
    assert_eq!(record.location, "Remote");
    assert_eq!(record.status, "Applied");
    assert_eq!(record.job_url, job_url().to_string());
    assert_eq!(
        record.date_applied,
        chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );

    // Review: the machine merges edits and asks for the submit.
    let mut machine = SessionMachine::new();
    machine.decide(&SessionInput::Opened { url: job_url() });
    machine.decide(&SessionInput::ScrapeSucceeded {
        record: record.clone(),
    });
    let mut edits = RecordEdits::from_record(&record);
    edits.status = "Applied".into();
    let action = machine.decide(&SessionInput::SaveConfirmed { edits });

    let submitted = match action {
        Some(SessionAction::SubmitRecord { record }) => record,
        other => panic!("expected SubmitRecord, got {:?}", other),
    };

    // Save.
    save(&bus, submitted).await.unwrap();

    let rows = sheet.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Acme");
    assert_eq!(rows[0][2], "Senior Engineer");
    assert_eq!(rows[0][3], "Remote");
    assert_eq!(rows[0][4], "Applied");
    assert_eq!(rows[0][5], job_url().to_string());
}

#[tokio::test]
async fn scraping_a_foreign_page_reports_the_domain_error() {
    let bus = MessageBus::new();
    serve(&bus, ScrapeHandler::new(FixtureFetcher { html: JOB_PAGE }));

    let url = Url::parse("https://example.com/jobs/1").unwrap();
    let error = scrape(&bus, url).await.unwrap_err();

    assert_eq!(error, "Not a Greenhouse job page");
}

#[tokio::test]
async fn fetch_failure_surfaces_as_a_scrape_error() {
    let bus = MessageBus::new();
    serve(&bus, ScrapeHandler::new(UnreachableFetcher));

    let error = scrape(&bus, job_url()).await.unwrap_err();

    assert!(error.contains("500"), "unexpected message: {error}");
}

#[tokio::test]
async fn request_without_any_handlers_reports_no_receivers() {
    let bus: MessageBus<TrackerMessage> = MessageBus::new();

    let result = request_timeout(
        &bus,
        TrackerMessage::Scrape { url: job_url() },
        Duration::from_millis(100),
        |_: &TrackerMessage| None::<()>,
    )
    .await;

    assert!(matches!(result, Err(RequestError::NoReceivers)));
}

#[tokio::test]
async fn rejected_save_carries_the_api_message_and_allows_a_retry() {
    let bus = MessageBus::new();
    let sheet = Arc::new(RecordingSheet::default());
    *sheet.fail_next.lock().unwrap() = Some(SheetsError::Api {
        status: 429,
        message: "Quota exceeded".into(),
    });
    serve(
        &bus,
        SheetsHandler::new(Arc::new(StaticTokens), sheet.clone()),
    );

    let record = JobRecord {
        company: "Acme".into(),
        title: "Engineer".into(),
        location: "Remote".into(),
        status: "Applied".into(),
        job_url: job_url().to_string(),
        date_applied: "2024-01-15".into(),
    };

    let error = save(&bus, record.clone()).await.unwrap_err();
    assert_eq!(error, "Quota exceeded");

    // The failure is not terminal: the next user-initiated save lands.
    save(&bus, record).await.unwrap();
    assert_eq!(sheet.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn denied_credentials_fail_the_save() {
    let bus = MessageBus::new();
    let sheet = Arc::new(RecordingSheet::default());
    serve(
        &bus,
        SheetsHandler::new(Arc::new(DeniedTokens), sheet.clone()),
    );

    let record = JobRecord {
        company: "Acme".into(),
        title: "Engineer".into(),
        location: "Remote".into(),
        status: "Applied".into(),
        job_url: job_url().to_string(),
        date_applied: "2024-01-15".into(),
    };

    let error = save(&bus, record).await.unwrap_err();
    assert_eq!(error, "Failed to get authentication token");
    assert!(sheet.rows.lock().unwrap().is_empty());
}
