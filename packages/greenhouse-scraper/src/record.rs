use serde::{Deserialize, Serialize};

/// Status stamped on every freshly scraped record.
pub const DEFAULT_STATUS: &str = "Applied";

/// One scraped job application.
///
/// `job_url` and `date_applied` are fixed at extraction time; the review
/// surface only ever edits the other four fields. Field names serialize
/// camelCase (`jobUrl`, `dateApplied`) to match the message payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub company: String,
    pub title: String,
    pub location: String,
    pub status: String,
    pub job_url: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date_applied: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let record = JobRecord {
            company: "Acme".into(),
            title: "Engineer".into(),
            location: "Remote".into(),
            status: DEFAULT_STATUS.into(),
            job_url: "https://boards.greenhouse.io/acme/jobs/1".into(),
            date_applied: "2024-01-15".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["jobUrl"], "https://boards.greenhouse.io/acme/jobs/1");
        assert_eq!(json["dateApplied"], "2024-01-15");
        assert_eq!(json["status"], "Applied");
    }
}
