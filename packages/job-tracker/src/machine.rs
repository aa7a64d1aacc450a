//! The review/save session as a pure state machine.
//!
//! The screen being shown and the record being reviewed are one owned
//! state value; every transition happens in `decide`. The front-end
//! renders whatever state the machine lands in and dispatches whatever
//! IO it asks for.

use greenhouse_scraper::{is_job_page_url, JobRecord};
use switchboard::Machine;
use url::Url;

/// Fields the user may change before saving. `job_url` and
/// `date_applied` are deliberately absent; edits cannot touch them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEdits {
    pub company: String,
    pub title: String,
    pub location: String,
    pub status: String,
}

impl RecordEdits {
    pub fn from_record(record: &JobRecord) -> Self {
        Self {
            company: record.company.clone(),
            title: record.title.clone(),
            location: record.location.clone(),
            status: record.status.clone(),
        }
    }
}

/// Inputs the front-end feeds into the machine.
#[derive(Debug, Clone)]
pub enum SessionInput {
    Opened { url: Url },
    ScrapeSucceeded { record: JobRecord },
    ScrapeFailed { error: String },
    SaveConfirmed { edits: RecordEdits },
    SaveSucceeded,
    SaveFailed { error: String },
}

/// IO the machine asks the front-end to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    RequestScrape { url: Url },
    SubmitRecord { record: JobRecord },
}

/// Screens of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Init,
    /// Not a job-board page; nothing to do this session.
    NotApplicable,
    Loading,
    /// Extraction failed; the user must open a valid page and start over.
    ErrorState { error: String },
    PreviewReady { record: JobRecord },
    Saving { record: JobRecord },
    /// Save failed; the record is kept so save can be re-attempted.
    SaveError { record: JobRecord, error: String },
    Saved,
}

/// One scrape-review-save cycle.
pub struct SessionMachine {
    state: SessionState,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Init,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for SessionMachine {
    type Event = SessionInput;
    type Command = SessionAction;

    fn decide(&mut self, event: &SessionInput) -> Option<SessionAction> {
        let state = std::mem::replace(&mut self.state, SessionState::Init);
        let (next, action) = transition(state, event);
        self.state = next;
        action
    }
}

fn transition(
    state: SessionState,
    event: &SessionInput,
) -> (SessionState, Option<SessionAction>) {
    match (state, event) {
        (SessionState::Init, SessionInput::Opened { url }) => {
            if is_job_page_url(url) {
                (
                    SessionState::Loading,
                    Some(SessionAction::RequestScrape { url: url.clone() }),
                )
            } else {
                (SessionState::NotApplicable, None)
            }
        }
        (SessionState::Loading, SessionInput::ScrapeSucceeded { record }) => (
            SessionState::PreviewReady {
                record: record.clone(),
            },
            None,
        ),
        (SessionState::Loading, SessionInput::ScrapeFailed { error }) => (
            SessionState::ErrorState {
                error: error.clone(),
            },
            None,
        ),
        (SessionState::PreviewReady { record }, SessionInput::SaveConfirmed { edits })
        | (SessionState::SaveError { record, .. }, SessionInput::SaveConfirmed { edits }) => {
            let record = apply_edits(&record, edits);
            (
                SessionState::Saving {
                    record: record.clone(),
                },
                Some(SessionAction::SubmitRecord { record }),
            )
        }
        (SessionState::Saving { .. }, SessionInput::SaveSucceeded) => (SessionState::Saved, None),
        (SessionState::Saving { record }, SessionInput::SaveFailed { error }) => (
            SessionState::SaveError {
                record,
                error: error.clone(),
            },
            None,
        ),
        // Anything else, including a save confirmed after `Saved`, is
        // ignored: the state stands and no IO is requested.
        (state, _) => (state, None),
    }
}

/// Merge user edits into the held record. `job_url` and `date_applied`
/// come from the held record alone.
fn apply_edits(record: &JobRecord, edits: &RecordEdits) -> JobRecord {
    JobRecord {
        company: edits.company.clone(),
        title: edits.title.clone(),
        location: edits.location.clone(),
        status: edits.status.clone(),
        job_url: record.job_url.clone(),
        date_applied: record.date_applied.clone(),
    }
}
