//! Generic JSON-over-HTTP exchange on top of an injectable transport.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::error::{ApiError, SmsGatewayError, TransportError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully built request handed to an [`HttpTransport`].
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Status and fully drained body of a response.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes HTTP requests for the client.
///
/// The default implementation is [`ReqwestTransport`]. Implement this trait to plug in a
/// different HTTP stack or a test double; timeouts and cancellation are its concern.
pub trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

#[derive(Debug, Clone, Default)]
/// [`HttpTransport`] backed by a `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.into(), request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(classify_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| TransportError::Network(Box::new(err)))?;
            Ok(HttpResponse { status, body })
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Request(Box::new(err))
    } else {
        TransportError::Network(Box::new(err))
    }
}

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Base URL plus transport: the part of the client every operation shares.
#[derive(Clone)]
pub(crate) struct RestClient {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl RestClient {
    pub(crate) fn new(base_url: impl Into<String>, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one exchange and decode the body into `R`.
    ///
    /// Returns `Ok(None)` for `204 No Content`.
    pub(crate) async fn execute<P, R>(
        &self,
        method: Method,
        path: &str,
        headers: &[(String, String)],
        payload: Option<&P>,
    ) -> Result<Option<R>, SmsGatewayError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.exchange(method, path, headers, payload).await?;
        if response.status == 204 {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(SmsGatewayError::Decode)
    }

    /// Run one exchange whose success body (if any) is ignored.
    pub(crate) async fn execute_no_content<P>(
        &self,
        method: Method,
        path: &str,
        headers: &[(String, String)],
        payload: Option<&P>,
    ) -> Result<(), SmsGatewayError>
    where
        P: Serialize + ?Sized,
    {
        self.exchange(method, path, headers, payload).await?;
        Ok(())
    }

    async fn exchange<P>(
        &self,
        method: Method,
        path: &str,
        headers: &[(String, String)],
        payload: Option<&P>,
    ) -> Result<HttpResponse, SmsGatewayError>
    where
        P: Serialize + ?Sized,
    {
        let mut request_headers = Vec::with_capacity(headers.len() + 1);
        let body = match payload {
            Some(payload) => {
                let bytes = serde_json::to_vec(payload).map_err(SmsGatewayError::Serialize)?;
                let overridden = headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE));
                if !overridden {
                    request_headers.push((CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned()));
                }
                Some(bytes)
            }
            None => None,
        };
        request_headers.extend(headers.iter().cloned());

        debug!(%method, path, "sending request");
        let response = self
            .http
            .execute(HttpRequest {
                method,
                url: format!("{}{}", self.base_url, path),
                headers: request_headers,
                body,
            })
            .await?;
        debug!(%method, path, status = response.status, "received response");

        if let Some(err) = ApiError::from_response(response.status, response.body.as_str()) {
            warn!(%method, path, status = err.status(), kind = ?err.kind(), "request failed");
            return Err(err.into());
        }

        Ok(response)
    }
}

/// Placeholder payload type for requests without a body.
pub(crate) const NO_BODY: Option<&()> = None;
