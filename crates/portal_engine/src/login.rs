//! Login workflow: fetch the login page, scrape its token, submit the
//! credentials and confirm the redirect that a successful login produces.

use portal_core::{Operation, ScrapeError};
use portal_logging::portal_debug;

use crate::web::{self, redirect_target, session_cookie};
use crate::{
    scrapers, Credentials, PortalConfig, PortalRequest, PortalResponse, RequestBody, Session,
    Transport, TransportError,
};

/// Status the portal answers with when a login redirect is confirmed.
const SEE_OTHER: u16 = 303;

/// Every way a login can fail. Each stage maps its own failure into exactly
/// one of these before it is joined with sibling stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("network")]
    Network(#[source] TransportError),
    #[error("scrape")]
    Scrape(#[source] ScrapeError),
    #[error("no session")]
    NoSession,
    #[error("no redirect")]
    NoRedirect,
    /// The portal signals bad credentials only by not handing out a fresh
    /// session cookie, so anything else that suppresses it lands here too.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl LoginError {
    pub fn kind(&self) -> &'static str {
        match self {
            LoginError::Network(_) => "network",
            LoginError::Scrape(_) => "scrape",
            LoginError::NoSession => "no-session",
            LoginError::NoRedirect => "no-redirect",
            LoginError::InvalidCredentials => "invalid-credentials",
        }
    }
}

pub(crate) fn run<'a>(
    transport: &'a dyn Transport,
    config: &'a PortalConfig,
    credentials: Credentials,
) -> Operation<'a, Session, LoginError> {
    let cookie = config.session_cookie.as_str();
    let login_url = config.login_url();
    let post_url = login_url.clone();

    fetch_login_page(transport, login_url.clone())
        .bind_async(move |page| {
            Operation::combine_two(
                Operation::from_result(scrape_login_token(&page)),
                Operation::from_result(find_session(&page, cookie, LoginError::NoSession)),
            )
        })
        .map(move |(token, pre_session)| (login_form(credentials, token), pre_session))
        .bind_async(move |(form, pre_session)| {
            post_credentials(transport, post_url, cookie, form, pre_session)
        })
        .bind_async(move |response| {
            Operation::combine_two(
                Operation::from_result(find_session(
                    &response,
                    cookie,
                    LoginError::InvalidCredentials,
                )),
                Operation::from_result(
                    redirect_target(&response, &login_url).ok_or(LoginError::NoRedirect),
                ),
            )
        })
        .bind_async(move |(session, target)| confirm_redirect(transport, cookie, session, target))
}

fn fetch_login_page(
    transport: &dyn Transport,
    url: String,
) -> Operation<'_, PortalResponse, LoginError> {
    let request = PortalRequest::get(url).keep_alive();
    web::send(transport, request, LoginError::Network)
}

fn scrape_login_token(page: &PortalResponse) -> Result<String, LoginError> {
    let document = web::parse_document(page);
    let token = scrapers::login_token()
        .scrape_document(&document)
        .map_err(LoginError::Scrape)?;
    portal_debug!("login token scraped ({} chars)", token.len());
    Ok(token)
}

fn find_session(
    response: &PortalResponse,
    cookie: &str,
    error_if_absent: LoginError,
) -> Result<Session, LoginError> {
    session_cookie(response, cookie)
        .map(Session::new)
        .ok_or(error_if_absent)
}

fn login_form(credentials: Credentials, token: String) -> RequestBody {
    RequestBody::Multipart(vec![
        ("username".to_string(), credentials.username),
        ("password".to_string(), credentials.password),
        ("logintoken".to_string(), token),
    ])
}

fn post_credentials<'a>(
    transport: &'a dyn Transport,
    url: String,
    cookie: &str,
    form: RequestBody,
    pre_session: Session,
) -> Operation<'a, PortalResponse, LoginError> {
    let request = PortalRequest::post(url, form)
        .cookie(cookie, pre_session.into_inner())
        .no_redirect()
        .keep_alive();
    web::send(transport, request, LoginError::Network)
}

fn confirm_redirect<'a>(
    transport: &'a dyn Transport,
    cookie: &str,
    session: Session,
    target: String,
) -> Operation<'a, Session, LoginError> {
    let request = PortalRequest::get(target)
        .cookie(cookie, session.as_str())
        .no_redirect()
        .keep_alive();
    web::send(transport, request, LoginError::Network).bind(move |response| {
        if response.status == SEE_OTHER {
            Ok(session)
        } else {
            portal_debug!("redirect confirmation answered {}", response.status);
            Err(LoginError::NoRedirect)
        }
    })
}
