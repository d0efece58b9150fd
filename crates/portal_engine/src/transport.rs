use std::time::Duration;

use futures_util::StreamExt;
use portal_logging::portal_debug;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use serde::{Deserialize, Serialize};

use crate::decode::decode_body;
use crate::{FailureKind, Method, PortalRequest, PortalResponse, RequestBody, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Applies only to requests that follow redirects.
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Performs one HTTP request on behalf of a workflow.
///
/// Non-2xx statuses are not failures here: the workflows inspect 3xx
/// responses themselves.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: PortalRequest) -> Result<PortalResponse, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    settings: TransportSettings,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, follow_redirects: bool) -> Result<reqwest::Client, TransportError> {
        let policy = if follow_redirects {
            let redirect_limit = self.settings.redirect_limit;
            reqwest::redirect::Policy::custom(move |attempt| {
                if attempt.previous().len() >= redirect_limit {
                    attempt.error("redirect limit exceeded")
                } else {
                    attempt.follow()
                }
            })
        } else {
            reqwest::redirect::Policy::none()
        };

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        request: PortalRequest,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let mut url = reqwest::Url::parse(&request.url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = client.request(method, url);

        for (name, value) in &request.headers {
            builder = builder.header(header_name(name)?, header_value(value)?);
        }
        if !request.cookies.is_empty() {
            let cookies = request
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, header_value(&cookies)?);
        }

        builder = match request.body {
            None => builder,
            Some(RequestBody::Form(fields)) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&fields)
                    .finish();
                builder
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded)
            }
            Some(RequestBody::Multipart(fields)) => {
                let form = fields
                    .into_iter()
                    .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                        form.text(name, value)
                    });
                builder.multipart(form)
            }
        };
        Ok(builder)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        portal_debug!(
            "{} {} follow_redirects={}",
            request.method,
            request.url,
            request.follow_redirects
        );
        let client = self.build_client(request.follow_redirects)?;
        let response = self
            .build_request(&client, request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = decode_body(&bytes, content_type.as_deref());
        portal_debug!(
            "status={} bytes={} encoding={} replaced_malformed={}",
            status,
            bytes.len(),
            body.encoding_label,
            body.had_errors
        );

        Ok(PortalResponse {
            status,
            headers,
            body: body.text,
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|err| TransportError::new(FailureKind::InvalidRequest, err.to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|err| TransportError::new(FailureKind::InvalidRequest, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return TransportError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(FailureKind::InvalidRequest, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
