use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default sheet tab receiving appended applications.
const DEFAULT_SHEET_NAME: &str = "Applications";

/// Application configuration loaded from environment variables.
/// Fixed for the life of the process; nothing here is runtime-editable.
#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    /// Pre-issued OAuth access token. Absent means the credential
    /// provider acquires one interactively.
    pub oauth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            spreadsheet_id: env::var("SPREADSHEET_ID").context("SPREADSHEET_ID must be set")?,
            sheet_name: env::var("SHEET_NAME").unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string()),
            oauth_token: env::var("GOOGLE_OAUTH_TOKEN").ok(),
        })
    }
}
