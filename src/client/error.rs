use std::error::Error as StdError;
use std::fmt;

use crate::domain::{ErrorResponse, ValidationError};

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Classification of a non-successful HTTP status.
///
/// `BadRequest` and `Conflict` are specializations of `Client`; all four are API errors.
pub enum ApiErrorKind {
    /// HTTP 400.
    BadRequest,
    /// HTTP 409.
    Conflict,
    /// Any other 4xx.
    Client,
    /// Any 5xx (or higher).
    Server,
}

impl ApiErrorKind {
    /// Classify `status`; `None` for statuses below 400.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            0..=399 => None,
            400 => Some(Self::BadRequest),
            409 => Some(Self::Conflict),
            500.. => Some(Self::Server),
            _ => Some(Self::Client),
        }
    }

    pub fn is_client_error(self) -> bool {
        matches!(self, Self::BadRequest | Self::Conflict | Self::Client)
    }

    pub fn is_server_error(self) -> bool {
        self == Self::Server
    }

    pub fn is_bad_request(self) -> bool {
        self == Self::BadRequest
    }

    pub fn is_conflict(self) -> bool {
        self == Self::Conflict
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A 4xx/5xx response, with the raw body kept for diagnostics.
pub struct ApiError {
    kind: ApiErrorKind,
    status: u16,
    body: String,
}

impl ApiError {
    /// Build an error for a failed response; `None` if `status` is not an error status.
    pub fn from_response(status: u16, body: impl Into<String>) -> Option<Self> {
        let kind = ApiErrorKind::from_status(status)?;
        Some(Self {
            kind,
            status,
            body: body.into(),
        })
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw response body as returned by the server.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parse the body as the gateway's JSON error envelope, if it is one.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        serde_json::from_str(&self.body).ok()
    }

    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    pub fn is_bad_request(&self) -> bool {
        self.kind.is_bad_request()
    }

    pub fn is_conflict(&self) -> bool {
        self.kind.is_conflict()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ApiErrorKind::BadRequest => {
                write!(f, "api error: client error: validation failed: {}", self.body)
            }
            ApiErrorKind::Conflict => write!(f, "api error: client error: conflict: {}", self.body),
            ApiErrorKind::Client => write!(
                f,
                "api error: client error: unexpected status code {} with body {}",
                self.status, self.body
            ),
            ApiErrorKind::Server => write!(
                f,
                "api error: server error: unexpected status code {} with body {}",
                self.status, self.body
            ),
        }
    }
}

impl StdError for ApiError {}

#[derive(Debug, thiserror::Error)]
/// Failure to get any HTTP response at all.
pub enum TransportError {
    /// The request could not be built (invalid URL, header, etc).
    #[error("failed to create request: {0}")]
    Request(#[source] BoxError),

    /// The request could not be completed (DNS, TLS, connect, body read, timeouts).
    #[error("failed to make request: {0}")]
    Network(#[source] BoxError),
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsGatewayClient`](crate::SmsGatewayClient).
///
/// Use the `is_*` predicates to inspect the API-error subtree without matching on
/// nested variants.
pub enum SmsGatewayError {
    /// HTTP client / transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be encoded as JSON.
    #[error("failed to marshal payload: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The server answered with a 4xx/5xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request DTO or the client configuration failed local validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SmsGatewayError {
    /// The classified API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        self.api_error().is_some()
    }

    pub fn is_client_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_client_error)
    }

    pub fn is_server_error(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_server_error)
    }

    pub fn is_bad_request(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_bad_request)
    }

    pub fn is_conflict(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_below_400_are_not_errors() {
        for status in [100, 200, 201, 204, 301, 399] {
            assert_eq!(ApiErrorKind::from_status(status), None, "{status}");
            assert!(ApiError::from_response(status, "").is_none());
        }
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(ApiErrorKind::from_status(400), Some(ApiErrorKind::BadRequest));
        assert_eq!(ApiErrorKind::from_status(409), Some(ApiErrorKind::Conflict));
        for status in [401, 403, 404, 408, 422, 429, 499] {
            assert_eq!(ApiErrorKind::from_status(status), Some(ApiErrorKind::Client));
        }
        for status in [500, 502, 503, 599, 600] {
            assert_eq!(ApiErrorKind::from_status(status), Some(ApiErrorKind::Server));
        }
    }

    #[test]
    fn membership_follows_the_hierarchy() {
        let bad_request = ApiError::from_response(400, "bad").unwrap();
        assert!(bad_request.is_client_error());
        assert!(bad_request.is_bad_request());
        assert!(!bad_request.is_conflict());
        assert!(!bad_request.is_server_error());

        let conflict = ApiError::from_response(409, "dup").unwrap();
        assert!(conflict.is_client_error());
        assert!(conflict.is_conflict());
        assert!(!conflict.is_bad_request());

        let not_found = ApiError::from_response(404, "").unwrap();
        assert!(not_found.is_client_error());
        assert!(!not_found.is_bad_request());
        assert!(!not_found.is_conflict());

        let server = ApiError::from_response(503, "down").unwrap();
        assert!(server.is_server_error());
        assert!(!server.is_client_error());
    }

    #[test]
    fn crate_error_predicates_delegate_to_api_error() {
        let err = SmsGatewayError::from(ApiError::from_response(409, "dup").unwrap());
        assert!(err.is_api_error());
        assert!(err.is_client_error());
        assert!(err.is_conflict());
        assert!(!err.is_server_error());
        assert_eq!(err.api_error().map(ApiError::status), Some(409));

        let err = SmsGatewayError::from(ValidationError::MissingContent);
        assert!(!err.is_api_error());
        assert!(!err.is_client_error());

        let err = SmsGatewayError::from(TransportError::Network("connection refused".into()));
        assert!(!err.is_api_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn display_carries_status_and_body() {
        let err = ApiError::from_response(400, "missing phone").unwrap();
        assert_eq!(
            err.to_string(),
            "api error: client error: validation failed: missing phone"
        );

        let err = ApiError::from_response(500, "boom").unwrap();
        assert_eq!(
            err.to_string(),
            "api error: server error: unexpected status code 500 with body boom"
        );

        let err = SmsGatewayError::from(ApiError::from_response(404, "nope").unwrap());
        assert_eq!(
            err.to_string(),
            "api error: client error: unexpected status code 404 with body nope"
        );
    }

    #[test]
    fn error_response_is_parsed_on_demand() {
        let body = r#"{"message":"Invalid phone","code":400}"#;
        let err = ApiError::from_response(400, body).unwrap();
        let parsed = err.error_response().unwrap();
        assert_eq!(parsed.message, "Invalid phone");

        let err = ApiError::from_response(502, "<html>bad gateway</html>").unwrap();
        assert!(err.error_response().is_none());
        assert_eq!(err.body(), "<html>bad gateway</html>");
    }
}
