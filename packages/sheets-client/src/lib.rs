//! Pure Google Sheets REST API client.
//!
//! A minimal client for the Sheets v4 values API. Supports appending a
//! single row to a configured sheet with user-entered value
//! interpretation, so dates land as dates rather than raw strings.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheets_client::SheetsClient;
//!
//! let client = SheetsClient::new("spreadsheet-id".into(), "Applications".into());
//! client.append_row("oauth-token", vec!["2024-01-15".into(), "Acme".into()]).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SheetsError};
pub use types::AppendRequest;

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Client bound to one spreadsheet and sheet tab.
pub struct SheetsClient {
    client: reqwest::Client,
    spreadsheet_id: String,
    sheet_name: String,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: String, sheet_name: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_id,
            sheet_name,
        }
    }

    /// Append endpoint for this client's sheet, covering columns A:F.
    fn append_url(&self) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}!A:F:append?valueInputOption=USER_ENTERED",
            BASE_URL, self.spreadsheet_id, self.sheet_name
        )
    }

    /// Append one row to the sheet.
    ///
    /// On a non-success status the error body is parsed for a structured
    /// message; a success body is not otherwise inspected.
    pub async fn append_row(&self, token: &str, row: Vec<String>) -> Result<()> {
        let body = AppendRequest { values: vec![row] };

        tracing::debug!(
            spreadsheet_id = %self.spreadsheet_id,
            sheet = %self.sheet_name,
            "Appending row"
        );

        let resp = self
            .client
            .post(self.append_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        tracing::info!(sheet = %self.sheet_name, "Row appended");
        Ok(())
    }
}

/// Pull the structured message out of an error body, falling back to a
/// generic status line.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<types::ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| format!("API Error: {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_url_targets_the_configured_sheet() {
        let client = SheetsClient::new("sheet123".into(), "Applications".into());
        assert_eq!(
            client.append_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/Applications!A:F:append?valueInputOption=USER_ENTERED"
        );
    }

    #[test]
    fn structured_error_message_is_surfaced() {
        let body = r#"{"error":{"message":"Quota exceeded"}}"#;
        assert_eq!(error_message(429, body), "Quota exceeded");
    }

    #[test]
    fn malformed_error_body_falls_back_to_the_status_line() {
        assert_eq!(error_message(500, "<html>oops</html>"), "API Error: 500");
    }

    #[test]
    fn error_body_without_a_message_falls_back_too() {
        assert_eq!(error_message(403, r#"{"error":{}}"#), "API Error: 403");
    }
}
