//! Courses workflow: fetch the home page with a session and scrape the
//! semester navigation.

use portal_core::{Operation, ScrapeError};

use crate::web;
use crate::{
    scrapers, FailureKind, PortalConfig, PortalRequest, PortalResponse, SemesterCourses,
    Session, Transport, TransportError,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoursesError {
    #[error("network")]
    Network(#[source] TransportError),
    #[error("scrape")]
    Scrape(#[source] ScrapeError),
    /// An expired session bounces between login pages until the redirect
    /// limit trips.
    #[error("invalid session")]
    InvalidSession,
}

impl CoursesError {
    pub fn kind(&self) -> &'static str {
        match self {
            CoursesError::Network(_) => "network",
            CoursesError::Scrape(_) => "scrape",
            CoursesError::InvalidSession => "invalid-session",
        }
    }
}

pub(crate) fn run<'a>(
    transport: &'a dyn Transport,
    config: &'a PortalConfig,
    session: &Session,
) -> Operation<'a, Vec<SemesterCourses>, CoursesError> {
    let request = PortalRequest::get(config.home_url())
        .cookie(config.session_cookie.as_str(), session.as_str())
        .keep_alive();
    web::send(transport, request, classify_transport_error).bind(|page| scrape_semesters(&page))
}

fn classify_transport_error(err: TransportError) -> CoursesError {
    match err.kind {
        FailureKind::RedirectLimitExceeded => CoursesError::InvalidSession,
        _ => CoursesError::Network(err),
    }
}

fn scrape_semesters(page: &PortalResponse) -> Result<Vec<SemesterCourses>, CoursesError> {
    let document = web::parse_document(page);
    scrapers::semester_list()
        .scrape_document(&document)
        .map_err(CoursesError::Scrape)
}
