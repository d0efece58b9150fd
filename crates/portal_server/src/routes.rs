//! HTTP boundary: turns workflow outcomes into JSON bodies or status codes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use portal_engine::{CoursesError, Credentials, LoginError, Portal, Session};
use portal_logging::{error_chain, portal_info, portal_warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SessionBody {
    session: Session,
}

#[derive(Debug, Deserialize)]
struct CoursesRequest {
    session: Session,
}

pub fn router(portal: Arc<Portal>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/user/courses", post(courses))
        .with_state(portal)
}

async fn health() -> &'static str {
    "ok"
}

async fn login(
    State(portal): State<Arc<Portal>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let username = credentials.username.clone();
    portal
        .login(credentials)
        .fold(
            |session| {
                portal_info!("/login: session issued for {}", username);
                Json(SessionBody { session }).into_response()
            },
            |err| {
                portal_warn!("/login [{}] for {}: {}", err.kind(), username, error_chain(&err));
                login_status(&err).into_response()
            },
        )
        .await
}

async fn courses(
    State(portal): State<Arc<Portal>>,
    Json(request): Json<CoursesRequest>,
) -> Response {
    portal
        .courses(&request.session)
        .fold(
            |semesters| {
                portal_info!("/user/courses: {} semesters", semesters.len());
                Json(semesters).into_response()
            },
            |err| {
                portal_warn!("/user/courses [{}]: {}", err.kind(), error_chain(&err));
                courses_status(&err).into_response()
            },
        )
        .await
}

pub fn login_status(err: &LoginError) -> StatusCode {
    match err {
        LoginError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
        LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        LoginError::Scrape(_) | LoginError::NoSession | LoginError::NoRedirect => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn courses_status(err: &CoursesError) -> StatusCode {
    match err {
        CoursesError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
        CoursesError::InvalidSession => StatusCode::UNAUTHORIZED,
        CoursesError::Scrape(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
