//! Terminal rendering for one session.
//!
//! Placeholder substitution for empty fields happens here, at display
//! time; the extraction layer hands over empty strings untouched.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use greenhouse_scraper::{JobRecord, DEFAULT_STATUS, JOB_BOARD_HOST};

use crate::machine::RecordEdits;

/// Placeholder text shown for fields extraction left empty.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_LOCATION: &str = "Location not specified";

/// How long the success notice stays on screen. Error notices persist.
const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

pub fn show_not_applicable() {
    println!(
        "{}",
        format!("This is not a Greenhouse job page. Open a posting on {JOB_BOARD_HOST} and try again.")
            .yellow()
    );
}

pub fn show_loading() {
    println!("{}", "Reading job posting...".dimmed());
}

pub fn show_error(message: &str) {
    println!("{} {}", "Error:".red().bold(), message.red());
}

/// The read-only half of the preview: where and when.
pub fn show_record(record: &JobRecord) {
    println!();
    println!("{}", "Job posting found".bold());
    println!("  {} {}", "URL:".bold(), record.job_url);
    println!("  {} {}", "Date applied:".bold(), record.date_applied);
    println!();
}

/// Editable preview: each field pre-filled with the scraped value, or a
/// placeholder when extraction came back empty.
pub fn prompt_edits(record: &JobRecord) -> Result<RecordEdits> {
    let theme = ColorfulTheme::default();
    Ok(RecordEdits {
        company: field_prompt(&theme, "Company", &record.company, UNKNOWN_COMPANY)?,
        title: field_prompt(&theme, "Title", &record.title, UNKNOWN_TITLE)?,
        location: field_prompt(&theme, "Location", &record.location, NO_LOCATION)?,
        status: field_prompt(&theme, "Status", &record.status, DEFAULT_STATUS)?,
    })
}

fn field_prompt(theme: &ColorfulTheme, label: &str, value: &str, placeholder: &str) -> Result<String> {
    let initial = if value.is_empty() { placeholder } else { value };
    let entered: String = Input::with_theme(theme)
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(entered.trim().to_string())
}

pub fn confirm_save() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save to Google Sheets?")
        .default(true)
        .interact()?)
}

pub fn confirm_retry() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Try saving again?")
        .default(true)
        .interact()?)
}

/// Success notice; clears itself after [`SUCCESS_NOTICE_TTL`].
pub async fn show_saved() -> Result<()> {
    let term = Term::stdout();
    println!("{}", "✓ Saved to Google Sheets!".green().bold());
    tokio::time::sleep(SUCCESS_NOTICE_TTL).await;
    term.clear_last_lines(1)?;
    Ok(())
}
