// Request layer
//
// One outbound call per `request`, with bearer-token injection and outcome
// normalization into a `ResponseEnvelope`. Domain services live in
// `services/` as inherent methods on `ApiClient`, so this module only deals
// with transport mechanics.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::envelope::ResponseEnvelope;
use crate::error::Error;
use crate::token::TokenStore;
use crate::transport::TransportConfig;

/// Request body variants.
#[derive(Debug)]
pub enum RequestBody {
    /// Pre-serialized JSON bytes.
    Json(Vec<u8>),
    /// Multipart form; the JSON content type is not sent.
    Multipart(reqwest::multipart::Form),
}

/// Options for a single call.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers. These replace the defaults on a name collision.
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn query(mut self, params: &[(&str, String)]) -> Self {
        self.query
            .extend(params.iter().map(|(k, v)| ((*k).to_owned(), v.clone())));
        self
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client for the platform gateway.
///
/// Holds the injected `reqwest::Client`, the gateway base URL every service
/// path is joined onto, and the token store read on each call.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the gateway root, e.g. `https://ops.example.com/api/`.
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn TokenStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, tokens))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            tokens,
        }
    }

    /// Ensure a trailing slash so relative service paths join beneath it.
    fn normalize_base_url(mut url: Url) -> Url {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store consulted on every request.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a service base path and percent-encoded segments onto the gateway.
    ///
    /// `endpoint("loans/api/v1/loans", &["L-1", "schedule"])` yields
    /// `{gateway}/loans/api/v1/loans/L-1/schedule`.
    ///
    /// Empty, `.` and `..` segments are rejected: `url` would drop them
    /// and the call would land on the parent resource.
    pub(crate) fn endpoint(&self, base_path: &str, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment((*bad).to_owned()));
        }
        let mut url = self.base_url.join(base_path)?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Perform one call and classify the outcome. Never fails.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> ResponseEnvelope<T> {
        let RequestOptions {
            method,
            headers,
            query,
            body,
        } = options;

        let multipart = matches!(body, Some(RequestBody::Multipart(_)));
        let headers = self.build_headers(&headers, multipart);

        debug!("{method} {url}");

        let mut builder = self.http.request(method, url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            Some(RequestBody::Json(bytes)) => builder.body(bytes),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        match builder.send().await {
            Ok(resp) => Self::classify(resp).await,
            Err(e) => {
                warn!(error = %e, "no response received");
                ResponseEnvelope::transport_failure(e.to_string())
            }
        }
    }

    /// Defaults first, then caller headers replacing any name they share.
    fn build_headers(&self, custom: &HeaderMap, multipart: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !multipart {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = self.tokens.load() {
            match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!("stored token is not a valid header value, sending without it: {e}"),
            }
        }

        for name in custom.keys() {
            headers.remove(name);
        }
        for (name, value) in custom {
            headers.append(name.clone(), value.clone());
        }
        headers
    }

    async fn classify<T: DeserializeOwned>(resp: reqwest::Response) -> ResponseEnvelope<T> {
        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        if status == StatusCode::NO_CONTENT {
            return ResponseEnvelope::no_content();
        }

        let body = match resp.text().await {
            Ok(text) => parse_body(&text),
            Err(e) => {
                warn!(error = %e, "failed to read response body");
                None
            }
        };

        if status.is_success() {
            let data = body.and_then(|value| {
                serde_json::from_value(value)
                    .inspect_err(|e| {
                        warn!(status = status.as_u16(), error = %e, "response body has an unexpected shape");
                    })
                    .ok()
            });
            ResponseEnvelope::success(status.as_u16(), data)
        } else {
            let message = error_message(status, body.as_ref());
            debug!(status = status.as_u16(), %message, "request failed");
            ResponseEnvelope::failure(status.as_u16(), message)
        }
    }

    // ── Convenience wrappers ─────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> ResponseEnvelope<T> {
        self.request(url, RequestOptions::new(Method::GET)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> ResponseEnvelope<T> {
        self.request(url, RequestOptions::new(Method::GET).query(params))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> ResponseEnvelope<T> {
        self.send_json(Method::POST, url, body).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> ResponseEnvelope<T> {
        self.send_json(Method::PUT, url, body).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> ResponseEnvelope<T> {
        self.send_json(Method::PATCH, url, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: Url) -> ResponseEnvelope<T> {
        self.request(url, RequestOptions::new(Method::DELETE)).await
    }

    /// POST a multipart form.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> ResponseEnvelope<T> {
        self.request(
            url,
            RequestOptions::new(Method::POST).body(RequestBody::Multipart(form)),
        )
        .await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ResponseEnvelope<T> {
        let mut options = RequestOptions::new(method);
        if let Some(body) = body {
            match serde_json::to_vec(body) {
                Ok(bytes) => options = options.body(RequestBody::Json(bytes)),
                Err(e) => {
                    warn!(error = %e, "request body could not be serialized");
                    return ResponseEnvelope::transport_failure(format!(
                        "failed to serialize request body: {e}"
                    ));
                }
            }
        }
        self.request(url, options).await
    }
}

/// Parse a body as JSON. Empty, malformed, and literal `null` bodies are all
/// treated as absent.
fn parse_body(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| !value.is_null())
}

/// The body's non-empty string `message`, or the generic status text.
fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map_or_else(
            || format!("Request failed with status {}", status.as_u16()),
            str::to_owned,
        )
}
