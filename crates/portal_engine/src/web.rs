use portal_core::{Html, Operation};
use reqwest::header::{LOCATION, SET_COOKIE};
use url::Url;

use crate::{PortalRequest, PortalResponse, Transport, TransportError};

/// Lifts one transport call into an [`Operation`], mapping the transport
/// failure into the caller's error type.
pub(crate) fn send<'a, E, M>(
    transport: &'a dyn Transport,
    request: PortalRequest,
    to_error: M,
) -> Operation<'a, PortalResponse, E>
where
    E: Send + 'a,
    M: FnOnce(TransportError) -> E + Send + 'a,
{
    Operation::from_raw_async(transport.request(request), to_error)
}

pub(crate) fn parse_document(response: &PortalResponse) -> Html {
    Html::parse_document(&response.body)
}

/// Value of the cookie `name` set by `response`, if any.
///
/// Looks through every `Set-Cookie` header and keeps the last one for `name`.
/// Empty values count as absent.
pub fn session_cookie(response: &PortalResponse, name: &str) -> Option<String> {
    response
        .headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(cookie_pair)
        .filter(|(cookie, _)| *cookie == name)
        .last()
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn cookie_pair(set_cookie: &str) -> Option<(&str, &str)> {
    let pair = set_cookie.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    (!name.is_empty()).then(|| (name, value.trim().trim_matches('"')))
}

/// Absolute target of the `Location` header, resolved against `base`.
pub fn redirect_target(response: &PortalResponse, base: &str) -> Option<String> {
    let location = response.headers.get(LOCATION)?.to_str().ok()?.trim();
    if location.is_empty() {
        return None;
    }
    match Url::parse(base) {
        Ok(base) => base.join(location).ok().map(String::from),
        Err(_) => Url::parse(location).ok().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn with_cookies(values: &[&'static str]) -> PortalResponse {
        values.iter().fold(PortalResponse::new(200, ""), |res, &value| {
            res.with_header(SET_COOKIE, HeaderValue::from_static(value))
        })
    }

    #[test]
    fn finds_named_cookie_among_several() {
        let res = with_cookies(&[
            "lang=en; Path=/",
            "MoodleSession=abc123; path=/; secure; HttpOnly",
        ]);
        assert_eq!(session_cookie(&res, "MoodleSession").as_deref(), Some("abc123"));
        assert_eq!(session_cookie(&res, "lang").as_deref(), Some("en"));
    }

    #[test]
    fn missing_or_empty_cookie_is_absent() {
        let res = with_cookies(&["MoodleSession=; Max-Age=0", "other=1"]);
        assert_eq!(session_cookie(&res, "MoodleSession"), None);
        assert_eq!(session_cookie(&PortalResponse::new(200, ""), "MoodleSession"), None);
    }

    #[test]
    fn later_cookie_replaces_expired_one() {
        let res = with_cookies(&[
            "MoodleSession=deleted; expires=Thu, 01-Jan-1970 00:00:01 GMT",
            "MoodleSession=fresh; path=/",
        ]);
        assert_eq!(session_cookie(&res, "MoodleSession").as_deref(), Some("fresh"));
    }

    #[test]
    fn relative_location_resolves_against_base() {
        let res =
            PortalResponse::new(303, "").with_header(LOCATION, HeaderValue::from_static("/home"));
        assert_eq!(
            redirect_target(&res, "https://portal.example/login/index.php").as_deref(),
            Some("https://portal.example/home")
        );
    }

    #[test]
    fn absolute_location_is_kept() {
        let res = PortalResponse::new(303, "")
            .with_header(LOCATION, HeaderValue::from_static("https://other.example/x?y=1"));
        assert_eq!(
            redirect_target(&res, "https://portal.example/").as_deref(),
            Some("https://other.example/x?y=1")
        );
        assert_eq!(redirect_target(&PortalResponse::new(303, ""), "https://portal.example/"), None);
    }
}
