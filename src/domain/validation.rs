use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    TooManyRecipients {
        max: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    MissingContent,
    ConflictingFields {
        fields: &'static str,
    },
    InvalidState {
        state: String,
    },
    IntervalOrder {
        min: u32,
        max: u32,
    },
    InvalidWebhookEvent {
        event: String,
    },
    InsecureUrl {
        url: String,
    },
    InvalidTimeRange,
    MissingCredentials,
    InvalidPathSegment {
        field: &'static str,
        value: String,
    },
}

impl ValidationError {
    /// Returns `true` when two mutually exclusive fields were set together.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictingFields { .. })
    }

    /// Returns `true` for configuration errors (as opposed to DTO errors).
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingCredentials)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} (max {max})")
            }
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(
                    f,
                    "{field} out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::MissingContent => write!(
                f,
                "validation failed: must specify exactly one of: textMessage or dataMessage"
            ),
            Self::ConflictingFields { fields } => write!(f, "conflict fields: {fields}"),
            Self::InvalidState { state } => {
                write!(f, "validation failed: invalid state value: {state}")
            }
            Self::IntervalOrder { min, max } => write!(
                f,
                "validation failed: send_interval_max ({max}) must be greater than or equal to send_interval_min ({min})"
            ),
            Self::InvalidWebhookEvent { event } => {
                write!(f, "validation failed: invalid event type: {event}")
            }
            Self::InsecureUrl { url } => {
                write!(f, "validation failed: url must start with https://: {url}")
            }
            Self::InvalidTimeRange => {
                write!(f, "validation failed: since must not be after until")
            }
            Self::MissingCredentials => write!(f, "invalid config: missing auth credentials"),
            Self::InvalidPathSegment { field, value } => {
                write!(f, "{field} is not a valid path segment: {value:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
