//! Portal engine: HTTP transport, portal scrapers and the login/courses
//! workflows built on `portal_core`.
mod config;
mod courses;
mod decode;
mod domain;
mod login;
mod portal;
mod transport;
mod types;
mod web;

pub mod scrapers;

pub use config::PortalConfig;
pub use courses::CoursesError;
pub use decode::{decode_body, DecodedBody};
pub use domain::{Course, Credentials, Season, Semester, SemesterCourses, Session};
pub use login::LoginError;
pub use portal::Portal;
pub use transport::{ReqwestTransport, Transport, TransportSettings};
pub use types::{FailureKind, Method, PortalRequest, PortalResponse, RequestBody, TransportError};
pub use web::{redirect_target, session_cookie};

/// Header names and values used to build and inspect portal responses.
pub use reqwest::header;
