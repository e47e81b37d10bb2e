use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::*;

impl LunaLinkApiClient {
    pub fn new(base_url: &str, session_cookie: Option<String>) -> Result<Self, ClientError> {
        let mut base_url = url::Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session_cookie: session_cookie.filter(|c| !c.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Resolve an absolute API path (e.g. `/chat/messages`) against the base URL.
    pub(super) fn endpoint(&self, path: &str) -> Result<url::Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build session headers. An unusable cookie value is dropped with a warning
    /// so the request still goes out (and fails with 401 if the server cares).
    fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &self.session_cookie {
            let value = if cookie.contains('=') {
                cookie.clone()
            } else {
                format!("{SESSION_COOKIE_NAME}={cookie}")
            };
            match HeaderValue::from_str(&value) {
                Ok(v) => {
                    headers.insert(COOKIE, v);
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring malformed session cookie"),
            }
        }
        headers
    }

    /// Execute a GET request with session headers and decode the JSON body.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .get(url)
            .headers(self.session_headers())
            .query(query)
            .send()
            .await?;
        Self::read_json(path, resp).await
    }

    /// Execute a POST request with session headers and a JSON body.
    pub(super) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .post(url)
            .headers(self.session_headers())
            .json(body)
            .send()
            .await?;
        Self::read_json(path, resp).await
    }

    /// Execute a multipart POST request with session headers.
    pub(super) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .post(url)
            .headers(self.session_headers())
            .multipart(form)
            .send()
            .await?;
        Self::read_json(path, resp).await
    }

    async fn read_json<T: DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "Got 401, session cookie is missing or expired");
        }

        if !status.is_success() {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: extract_error(&body),
            });
        }

        // Ack-style endpoints may answer with an empty body.
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

/// Pull the human-readable error out of a `{"error": ...}` / `{"message": ...}`
/// body, falling back to the raw text.
pub(super) fn extract_error(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error").or_else(|| v.get("message")))
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| body.trim().to_string())
}
