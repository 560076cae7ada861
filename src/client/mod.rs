//! Client layer: configuration, authentication and the typed API façade.

mod error;
mod http;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use crate::domain::{
    Device, DeviceSettings, HealthResponse, LogEntry, Message, MessageState,
    MessagesExportRequest, SendOptions, TokenRequest, TokenResponse, ValidationError, Webhook,
};
use crate::transport::{self, path};

pub use error::{ApiError, ApiErrorKind, BoxError, SmsGatewayError, TransportError};
pub use http::{BoxFuture, HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};

use http::{NO_BODY, RestClient};

/// Production endpoint of the hosted gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.sms-gate.app/3rdparty/v1";

const AUTHORIZATION: &str = "Authorization";

#[derive(Clone, PartialEq, Eq)]
/// Credentials sent in the `Authorization` header.
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Value of the `Authorization` header for these credentials.
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
            Self::Bearer(token) => format!("Bearer {token}"),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Clone)]
/// Settings for [`SmsGatewayClient`].
///
/// Either a username/password pair or a bearer token is required. When both are present the
/// token is used.
pub struct Config {
    base_url: String,
    username: String,
    password: String,
    token: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            username: String::new(),
            password: String::new(),
            token: String::new(),
            timeout: None,
            user_agent: None,
            http_client: None,
            transport: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL. An empty value restores [`DEFAULT_BASE_URL`].
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = if base_url.trim().is_empty() {
            DEFAULT_BASE_URL.to_owned()
        } else {
            base_url.trim_end_matches('/').to_owned()
        };
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Whole-request timeout for the built-in `reqwest` transport.
    ///
    /// Ignored when a custom client or transport is supplied.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` for the built-in `reqwest` transport.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, pools).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the HTTP stack entirely. Takes precedence over [`Config::with_http_client`].
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.is_empty() && self.username.is_empty() && self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }

    /// Credentials in effect; the bearer token wins over basic auth.
    pub fn auth(&self) -> Auth {
        if self.token.is_empty() {
            Auth::basic(&self.username, &self.password)
        } else {
            Auth::bearer(&self.token)
        }
    }

    fn build_transport(&self) -> Result<Arc<dyn HttpTransport>, SmsGatewayError> {
        if let Some(transport) = &self.transport {
            return Ok(Arc::clone(transport));
        }
        if let Some(client) = &self.http_client {
            return Ok(Arc::new(ReqwestTransport::new(client.clone())));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::Request(Box::new(err)))?;
        Ok(Arc::new(ReqwestTransport::new(client)))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() { "" } else { "<redacted>" }
        }

        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("token", &redact(&self.token))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("custom_http_client", &self.http_client.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

#[derive(Clone)]
/// Typed client for the gateway's 3rd-party API.
///
/// Every method performs exactly one HTTP exchange. Methods taking a request DTO validate it
/// first and fail with [`SmsGatewayError::Validation`] without touching the network.
pub struct SmsGatewayClient {
    rest: RestClient,
    auth: Auth,
}

impl fmt::Debug for SmsGatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsGatewayClient")
            .field("base_url", &self.rest.base_url())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl SmsGatewayClient {
    /// Validate `config` and build a client.
    pub fn new(config: Config) -> Result<Self, SmsGatewayError> {
        config.validate()?;
        let http = config.build_transport()?;
        Ok(Self {
            rest: RestClient::new(config.base_url.clone(), http),
            auth: config.auth(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    fn headers(&self) -> [(String, String); 1] {
        [(AUTHORIZATION.to_owned(), self.auth.header_value())]
    }

    /// Enqueue a message for sending.
    ///
    /// A success response without a body yields `MessageState::default()`.
    pub async fn send(
        &self,
        message: &Message,
        options: SendOptions,
    ) -> Result<MessageState, SmsGatewayError> {
        message.validate()?;
        let path = transport::with_query(path::MESSAGES, &transport::encode_send_options(&options));
        let state = self
            .rest
            .execute(Method::Post, &path, &self.headers(), Some(message))
            .await?;
        Ok(state.unwrap_or_default())
    }

    pub async fn get_state(&self, id: &str) -> Result<MessageState, SmsGatewayError> {
        let state = self
            .rest
            .execute(Method::Get, &path::message(id)?, &self.headers(), NO_BODY)
            .await?;
        Ok(state.unwrap_or_default())
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>, SmsGatewayError> {
        let devices = self
            .rest
            .execute(Method::Get, path::DEVICES, &self.headers(), NO_BODY)
            .await?;
        Ok(devices.unwrap_or_default())
    }

    pub async fn delete_device(&self, id: &str) -> Result<(), SmsGatewayError> {
        self.rest
            .execute_no_content(Method::Delete, &path::device(id)?, &self.headers(), NO_BODY)
            .await
    }

    pub async fn check_health(&self) -> Result<HealthResponse, SmsGatewayError> {
        let health = self
            .rest
            .execute(Method::Get, path::HEALTH, &self.headers(), NO_BODY)
            .await?;
        Ok(health.unwrap_or_default())
    }

    /// Ask the device to re-deliver inbox messages received in `[since, until]` as webhooks.
    pub async fn export_inbox(
        &self,
        request: &MessagesExportRequest,
    ) -> Result<(), SmsGatewayError> {
        request.validate()?;
        self.rest
            .execute_no_content(Method::Post, path::INBOX_EXPORT, &self.headers(), Some(request))
            .await
    }

    pub async fn get_logs(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, SmsGatewayError> {
        let path = transport::with_query(path::LOGS, &transport::encode_logs_query(from, to));
        let entries = self
            .rest
            .execute(Method::Get, &path, &self.headers(), NO_BODY)
            .await?;
        Ok(entries.unwrap_or_default())
    }

    pub async fn get_settings(&self) -> Result<DeviceSettings, SmsGatewayError> {
        let settings = self
            .rest
            .execute(Method::Get, path::SETTINGS, &self.headers(), NO_BODY)
            .await?;
        Ok(settings.unwrap_or_default())
    }

    /// Merge `settings` into the stored ones; absent fields stay untouched.
    pub async fn update_settings(
        &self,
        settings: &DeviceSettings,
    ) -> Result<DeviceSettings, SmsGatewayError> {
        self.write_settings(Method::Patch, settings).await
    }

    /// Replace the stored settings with `settings`.
    pub async fn replace_settings(
        &self,
        settings: &DeviceSettings,
    ) -> Result<DeviceSettings, SmsGatewayError> {
        self.write_settings(Method::Put, settings).await
    }

    async fn write_settings(
        &self,
        method: Method,
        settings: &DeviceSettings,
    ) -> Result<DeviceSettings, SmsGatewayError> {
        settings.validate()?;
        let stored = self
            .rest
            .execute(method, path::SETTINGS, &self.headers(), Some(settings))
            .await?;
        Ok(stored.unwrap_or_default())
    }

    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, SmsGatewayError> {
        let webhooks = self
            .rest
            .execute(Method::Get, path::WEBHOOKS, &self.headers(), NO_BODY)
            .await?;
        Ok(webhooks.unwrap_or_default())
    }

    /// Register `webhook`; an empty success response echoes the submitted registration.
    pub async fn register_webhook(&self, webhook: &Webhook) -> Result<Webhook, SmsGatewayError> {
        webhook.validate()?;
        let registered = self
            .rest
            .execute(Method::Post, path::WEBHOOKS, &self.headers(), Some(webhook))
            .await?;
        Ok(registered.unwrap_or_else(|| webhook.clone()))
    }

    pub async fn delete_webhook(&self, id: &str) -> Result<(), SmsGatewayError> {
        self.rest
            .execute_no_content(Method::Delete, &path::webhook(id)?, &self.headers(), NO_BODY)
            .await
    }

    /// Issue a JWT with the requested scopes.
    pub async fn generate_token(
        &self,
        request: &TokenRequest,
    ) -> Result<TokenResponse, SmsGatewayError> {
        request.validate()?;
        let token = self
            .rest
            .execute(Method::Post, path::TOKEN, &self.headers(), Some(request))
            .await?;
        Ok(token.unwrap_or_default())
    }

    /// Revoke a token by its `jti`.
    pub async fn revoke_token(&self, jti: &str) -> Result<(), SmsGatewayError> {
        self.rest
            .execute_no_content(Method::Delete, &path::token(jti)?, &self.headers(), NO_BODY)
            .await
    }
}
