use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;
use crate::domain::value::check_length;

pub const DEVICE_ID_MAX_LEN: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Query options for [`send`](crate::SmsGatewayClient::send).
///
/// Each `with_*` call returns an updated copy; unset options are not sent.
pub struct SendOptions {
    skip_phone_validation: Option<bool>,
    device_active_within: Option<u32>,
}

impl SendOptions {
    /// Query key for the phone validation switch.
    pub const SKIP_PHONE_VALIDATION: &'static str = "skipPhoneValidation";
    /// Query key for the device activity window.
    pub const DEVICE_ACTIVE_WITHIN: &'static str = "deviceActiveWithin";

    pub fn new() -> Self {
        Self::default()
    }

    /// Skip server-side phone number validation (validation is on by default).
    pub fn with_skip_phone_validation(mut self, skip: bool) -> Self {
        self.skip_phone_validation = Some(skip);
        self
    }

    /// Only route through devices seen within the last `hours` hours.
    pub fn with_device_active_within(mut self, hours: u32) -> Self {
        self.device_active_within = Some(hours);
        self
    }

    pub fn skip_phone_validation(&self) -> Option<bool> {
        self.skip_phone_validation
    }

    pub fn device_active_within(&self) -> Option<u32> {
        self.device_active_within
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Request for a scoped access token.
pub struct TokenRequest {
    /// Lifetime in seconds; `0` asks for the maximum the server allows.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u64,
    pub scopes: Vec<String>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl TokenRequest {
    pub const SCOPES_FIELD: &'static str = "scopes";

    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ttl: 0,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_ttl(mut self, seconds: u64) -> Self {
        self.ttl = seconds;
        self
    }

    /// At least one scope, none of them empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scopes.is_empty() || self.scopes.iter().any(String::is_empty) {
            return Err(ValidationError::Empty {
                field: Self::SCOPES_FIELD,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ask a device to re-deliver its inbox for a time range via webhooks.
pub struct MessagesExportRequest {
    pub device_id: String,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl MessagesExportRequest {
    pub const DEVICE_ID_FIELD: &'static str = "deviceId";

    pub fn new(device_id: impl Into<String>, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.into(),
            since,
            until,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length(Self::DEVICE_ID_FIELD, &self.device_id, DEVICE_ID_MAX_LEN)?;
        if self.since > self.until {
            return Err(ValidationError::InvalidTimeRange);
        }
        Ok(())
    }
}
