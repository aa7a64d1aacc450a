// Main entry point for the job tracker CLI

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use job_tracker::auth::{CachedTokenProvider, TokenProvider};
use job_tracker::config::Config;
use job_tracker::fetch::HttpPageFetcher;
use job_tracker::handlers::{ScrapeHandler, SheetsHandler};
use job_tracker::machine::{SessionAction, SessionInput, SessionMachine, SessionState};
use job_tracker::messages::TrackerMessage;
use job_tracker::ui;
use sheets_client::SheetsClient;
use switchboard::{request_timeout, serve, Machine, MessageBus, RequestError};

/// Capture a Greenhouse job posting into a Google Sheet.
#[derive(Parser, Debug)]
#[command(name = "jobtrack", version, about)]
struct Args {
    /// URL of the job posting to capture
    url: String,
}

/// How long to wait for the scrape and save contexts to answer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let url = Url::parse(&args.url).context("the job posting URL must be absolute")?;

    let config = Config::from_env().context("Failed to load configuration")?;

    // Wire the two background contexts onto the bus before the session
    // starts, so their subscriptions exist ahead of the first request.
    let bus = MessageBus::new();

    let fetcher = HttpPageFetcher::new().context("Failed to build HTTP client")?;
    serve(&bus, ScrapeHandler::new(fetcher));

    let tokens: Arc<dyn TokenProvider> =
        Arc::new(CachedTokenProvider::new(config.oauth_token.clone()));
    let sheets = SheetsClient::new(config.spreadsheet_id.clone(), config.sheet_name.clone());
    serve(&bus, SheetsHandler::new(tokens, sheets));

    run_session(&bus, url).await
}

/// Drive one scrape-review-save cycle to a terminal state.
async fn run_session(bus: &MessageBus<TrackerMessage>, url: Url) -> Result<()> {
    let mut machine = SessionMachine::new();
    let mut pending = machine.decide(&SessionInput::Opened { url });

    loop {
        // Dispatch whatever IO the machine asked for and feed the outcome
        // back in as the next input.
        if let Some(action) = pending.take() {
            let input = dispatch(bus, action).await;
            pending = machine.decide(&input);
            continue;
        }

        match machine.state() {
            SessionState::NotApplicable => {
                ui::show_not_applicable();
                return Ok(());
            }
            SessionState::ErrorState { error } => {
                ui::show_error(error);
                std::process::exit(1);
            }
            SessionState::PreviewReady { record } => {
                let record = record.clone();
                ui::show_record(&record);
                let edits = ui::prompt_edits(&record)?;
                if !ui::confirm_save()? {
                    return Ok(());
                }
                pending = machine.decide(&SessionInput::SaveConfirmed { edits });
            }
            SessionState::SaveError { record, error } => {
                let record = record.clone();
                ui::show_error(error);
                if !ui::confirm_retry()? {
                    std::process::exit(1);
                }
                let edits = ui::prompt_edits(&record)?;
                pending = machine.decide(&SessionInput::SaveConfirmed { edits });
            }
            SessionState::Saved => {
                ui::show_saved().await?;
                return Ok(());
            }
            SessionState::Init | SessionState::Loading | SessionState::Saving { .. } => {
                // Transitional states always resolve through pending IO;
                // landing here without any means the machine ignored an
                // input it should not have seen.
                anyhow::bail!("session stalled in a transitional state");
            }
        }
    }
}

/// Perform one bus round-trip for `action` and translate the outcome,
/// transport failures included, into the machine's next input.
async fn dispatch(bus: &MessageBus<TrackerMessage>, action: SessionAction) -> SessionInput {
    match action {
        SessionAction::RequestScrape { url } => {
            ui::show_loading();
            let outcome = request_timeout(
                bus,
                TrackerMessage::Scrape { url },
                REQUEST_TIMEOUT,
                |message| match message {
                    TrackerMessage::Scraped { record } => Some(Ok(record.clone())),
                    TrackerMessage::ScrapeFailed { error } => Some(Err(error.clone())),
                    _ => None,
                },
            )
            .await;

            match outcome {
                Ok(Ok(record)) => SessionInput::ScrapeSucceeded { record },
                Ok(Err(error)) => SessionInput::ScrapeFailed { error },
                Err(transport) => SessionInput::ScrapeFailed {
                    error: transport_message(&transport),
                },
            }
        }
        SessionAction::SubmitRecord { record } => {
            let outcome = request_timeout(
                bus,
                TrackerMessage::SaveToSheets { record },
                REQUEST_TIMEOUT,
                |message| match message {
                    TrackerMessage::Saved => Some(Ok(())),
                    TrackerMessage::SaveFailed { error } => Some(Err(error.clone())),
                    _ => None,
                },
            )
            .await;

            match outcome {
                Ok(Ok(())) => SessionInput::SaveSucceeded,
                Ok(Err(error)) => SessionInput::SaveFailed { error },
                Err(transport) => SessionInput::SaveFailed {
                    error: transport_message(&transport),
                },
            }
        }
    }
}

/// A missing receiving end reads like the original's "refresh the page"
/// hint rather than a raw channel error.
fn transport_message(error: &RequestError) -> String {
    match error {
        RequestError::NoReceivers => {
            "No handler is listening, please restart and try again".to_string()
        }
        other => other.to_string(),
    }
}
