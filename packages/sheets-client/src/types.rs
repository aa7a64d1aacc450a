use serde::{Deserialize, Serialize};

/// Body of a values append call.
#[derive(Debug, Clone, Serialize)]
pub struct AppendRequest {
    pub values: Vec<Vec<String>>,
}

/// Error body shape the API uses for rejections:
/// `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
}
