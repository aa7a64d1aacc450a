//! Capture Greenhouse job postings into a Google Sheet.
//!
//! Three contexts share one message bus: a scrape handler turns a page
//! into a [`greenhouse_scraper::JobRecord`], the session front-end runs
//! the review/confirm cycle, and a sheets handler performs the
//! authenticated append. The front-end suspends at each bus boundary;
//! at most one request of each kind is ever in flight per session.

pub mod auth;
pub mod config;
pub mod fetch;
pub mod handlers;
pub mod machine;
pub mod messages;
pub mod ui;
