#![allow(dead_code)]

use std::sync::Mutex;

use portal_engine::header::{HeaderValue, LOCATION, SET_COOKIE};
use portal_engine::{
    FailureKind, Method, PortalRequest, PortalResponse, Transport, TransportError,
};

pub const BASE_URL: &str = "https://portal.test";
pub const LOGIN_URL: &str = "https://portal.test/login/index.php";
pub const HOME_URL: &str = "https://portal.test/home";

pub const LOGIN_PAGE: &str = r#"
<html><head><title>Log in</title></head>
<body>
  <form action="/login/index.php" method="post">
    <input type="hidden" name="logintoken" value="tok123">
    <input type="text" name="username">
    <input type="password" name="password">
  </form>
</body></html>
"#;

pub const LOGIN_PAGE_WITHOUT_TOKEN: &str = r#"
<html><body>
  <form action="/login/index.php" method="post">
    <input type="text" name="username">
  </form>
</body></html>
"#;

pub const HOME_PAGE: &str = r#"
<html><body>
<div class="block_navigation"><div class="card-body"><div class="card-text">
<ul><li>
  <ul>
    <li>Dashboard</li>
    <li>Site home</li>
    <li>
      <ul>
        <li>Calendar</li>
        <li>Files</li>
        <li>
          <p><span>WS2023</span></p>
          <ul>
            <li><a href="https://portal.test/course/view.php?id=101"
                   title="Databases ILV (Jane Doe)">DB</a></li>
            <li><a href="https://portal.test/course/view.php?id=102"
                   title="Networks VO (John Roe)">NET</a></li>
          </ul>
        </li>
        <li>
          <p><span>SS2024</span></p>
          <ul>
            <li><a href="https://portal.test/course/view.php?id=201"
                   title="Compilers ILV (Jane Doe)">CC</a></li>
          </ul>
        </li>
      </ul>
    </li>
  </ul>
</li></ul>
</div></div></div>
</body></html>
"#;

pub fn set_cookie(value: &'static str) -> (portal_engine::header::HeaderName, HeaderValue) {
    (SET_COOKIE, HeaderValue::from_static(value))
}

pub fn location(value: &'static str) -> (portal_engine::header::HeaderName, HeaderValue) {
    (LOCATION, HeaderValue::from_static(value))
}

pub fn response(
    status: u16,
    body: &str,
    headers: Vec<(portal_engine::header::HeaderName, HeaderValue)>,
) -> PortalResponse {
    headers
        .into_iter()
        .fold(PortalResponse::new(status, body), |res, (name, value)| {
            res.with_header(name, value)
        })
}

/// Answers requests from a fixed route table and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<(Method, String, Result<PortalResponse, TransportError>)>,
    calls: Mutex<Vec<PortalRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: Method, url: &str, response: PortalResponse) -> Self {
        self.routes.push((method, url.to_string(), Ok(response)));
        self
    }

    pub fn fail(mut self, method: Method, url: &str, error: TransportError) -> Self {
        self.routes.push((method, url.to_string(), Err(error)));
        self
    }

    pub fn calls(&self) -> Vec<PortalRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<Method> {
        self.calls().into_iter().map(|call| call.method).collect()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        self.routes
            .iter()
            .find(|(method, url, _)| *method == request.method && *url == request.url)
            .map(|(_, _, outcome)| outcome.clone())
            .unwrap_or_else(|| {
                Err(TransportError::new(
                    FailureKind::Network,
                    format!("no route for {} {}", request.method, request.url),
                ))
            })
    }
}
