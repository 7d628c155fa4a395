//! Envelope-aware HTTP client.
//!
//! [`HttpClient`] attaches the bearer token, unwraps the
//! `{code, data, message}` envelope, and routes failures to a
//! [`Notifier`]: a non-zero code surfaces the backend's message, an HTTP
//! 401 asks the user to sign in again.

use std::sync::Arc;
use std::time::Duration;

use dida_proto::envelope::{ApiEnvelope, EnvelopeError};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::HttpError;
use crate::message::Notifier;
use crate::token::TokenStore;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the dida backend.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    token: TokenStore,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.has_token())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// Paths passed to the request methods are resolved relative to the
    /// base, so `http://host/api` and `http://host/api/` behave the same.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`HttpError::Transport`] if the underlying client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: TokenStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, HttpError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
            notifier,
        })
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(self.request(Method::GET, path)?).await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`HttpError`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, HttpError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| HttpError::InvalidPath {
                path: path.to_string(),
                source,
            })?;
        let builder = self.client.request(method, url);
        Ok(match self.token.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, HttpError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(url = %response.url(), "request rejected with 401");
            self.notifier.redirect_to_sign_in();
            return Err(HttpError::Unauthorized);
        }

        let body = response.bytes().await?;
        let envelope = match ApiEnvelope::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(HttpError::Status(status.as_u16())),
            Err(e) => return Err(e.into()),
        };

        match envelope.into_data() {
            Ok(data) => Ok(data),
            Err(EnvelopeError::Api { code, message }) => {
                self.notifier.error(&message);
                Err(HttpError::Api { code, message })
            }
            Err(e) => Err(e.into()),
        }
    }
}
