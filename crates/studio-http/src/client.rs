//! HTTP client for the admin API envelope protocol.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use studio_core::Result;
use studio_core::error::{AuthError, Error, InvalidInputError, RemoteError, TransportError};
use studio_core::models::{ApiResponse, ErrorBody};

/// Transport settings shared by every client a factory builds.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("studio-admin/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    pub(crate) fn builder(&self) -> reqwest::ClientBuilder {
        let builder = reqwest::Client::builder().user_agent(&self.user_agent);
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }
}

/// Map a reqwest failure onto the transport taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let transport = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else if err.is_decode() {
        TransportError::Decode { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(transport)
}

/// An HTTP client rooted at one base URL.
///
/// Paths are given as segments below the base; each segment is
/// percent-encoded, so ids can be passed through verbatim.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub(crate) fn new(http: reqwest::Client, base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| InvalidInputError::Other {
            message: format!("invalid base URL '{}': {}", base, e),
        })?;
        Ok(Self { http, base })
    }

    /// Returns the base URL every request is rooted at.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Build the URL for the given path segments below the base.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| InvalidInputError::Other {
                message: format!("base URL '{}' cannot carry a path", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and unwrap the envelope.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get<R>(&self, segments: &[&str]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "GET");
        self.send(self.http.get(url)).await
    }

    /// GET with query parameters passed through as-is.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get_with<Q, R>(&self, segments: &[&str], query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "GET");
        trace!(?query, "query parameters");
        self.send(self.http.get(url).query(query)).await
    }

    /// POST a JSON body.
    #[instrument(skip(self, body), fields(base = %self.base))]
    pub async fn post<B, R>(&self, segments: &[&str], body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "POST");
        self.send(self.http.post(url).json(body)).await
    }

    /// POST with no request body.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn post_empty<R>(&self, segments: &[&str]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "POST (no body)");
        self.send(self.http.post(url)).await
    }

    /// PUT a JSON body.
    #[instrument(skip(self, body), fields(base = %self.base))]
    pub async fn put<B, R>(&self, segments: &[&str], body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "PUT");
        self.send(self.http.put(url).json(body)).await
    }

    /// DELETE, ignoring any payload.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.url_for(segments)?;
        debug!(%url, "DELETE");
        let _: Option<serde_json::Value> = self.send(self.http.delete(url)).await?;
        Ok(())
    }

    /// POST a multipart form.
    #[instrument(skip(self, form), fields(base = %self.base))]
    pub async fn post_multipart<R>(
        &self,
        segments: &[&str],
        form: reqwest::multipart::Form,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, "POST (multipart)");
        self.send(self.http.post(url).multipart(form)).await
    }

    /// Send a prepared request and unwrap the envelope.
    pub(crate) async fn send<R>(&self, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = request.send().await.map_err(transport_error)?;
        handle_response(response).await
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Decode a response: `data` on success, a typed error otherwise.
async fn handle_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    trace!(status = %status, "response");

    if status.is_success() {
        let bytes = response.bytes().await.map_err(transport_error)?;
        // 204s and empty 200s carry no envelope
        let decoded = if bytes.is_empty() {
            serde_json::from_str::<ApiResponse<R>>(r#"{"data":null}"#)
        } else {
            serde_json::from_slice::<ApiResponse<R>>(&bytes)
        };
        let envelope = decoded.map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })?;
        Ok(envelope.into_data())
    } else {
        Err(error_from_response(response).await)
    }
}

/// Classify a non-success response.
///
/// 401 is always [`AuthError::Unauthenticated`]; any other status with a
/// message becomes [`RemoteError`]; the rest is a bare status error.
async fn error_from_response(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();

    if status == 401 {
        return AuthError::Unauthenticated.into();
    }

    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    let code = body.code;
    match body.into_message() {
        Some(message) => RemoteError::new(status, code, message).into(),
        None => TransportError::Status { status }.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn url_for_appends_segments() {
        let api = client("https://api.studio.app/api/v1/admin/templates");
        assert_eq!(
            api.url_for(&["42", "duplicate"]).unwrap().as_str(),
            "https://api.studio.app/api/v1/admin/templates/42/duplicate"
        );
        assert_eq!(
            api.url_for(&[]).unwrap().as_str(),
            "https://api.studio.app/api/v1/admin/templates"
        );
    }

    #[test]
    fn url_for_encodes_ids() {
        let api = client("https://api.studio.app/api/v1/admin/jobs");
        assert_eq!(
            api.url_for(&["a/b c"]).unwrap().as_str(),
            "https://api.studio.app/api/v1/admin/jobs/a%2Fb%20c"
        );
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(ClientOptions::default().user_agent.starts_with("studio-admin/"));
    }
}
