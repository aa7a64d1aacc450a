use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetsError>;

#[derive(Debug, Error)]
pub enum SheetsError {
    /// Transport-level failure before any HTTP status was available.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status. `message` is the
    /// structured error message when the body carried one, otherwise a
    /// generic `API Error: <status>` line.
    #[error("{message}")]
    Api { status: u16, message: String },
}
