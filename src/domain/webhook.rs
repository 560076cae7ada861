use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Event a webhook subscribes to.
///
/// Unknown event names decode into [`WebhookEvent::Unknown`] so that a listing from a
/// newer server still parses; [`Webhook::validate`] rejects them before registration.
pub enum WebhookEvent {
    /// `sms:received`
    SmsReceived,
    /// `sms:data-received`
    SmsDataReceived,
    /// `sms:sent`
    SmsSent,
    /// `sms:delivered`
    SmsDelivered,
    /// `sms:failed`
    SmsFailed,
    /// `system:ping`
    SystemPing,
    Unknown(String),
}

impl WebhookEvent {
    /// Every event the gateway accepts.
    pub const ALL: [Self; 6] = [
        Self::SmsReceived,
        Self::SmsDataReceived,
        Self::SmsSent,
        Self::SmsDelivered,
        Self::SmsFailed,
        Self::SystemPing,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::SmsReceived => "sms:received",
            Self::SmsDataReceived => "sms:data-received",
            Self::SmsSent => "sms:sent",
            Self::SmsDelivered => "sms:delivered",
            Self::SmsFailed => "sms:failed",
            Self::SystemPing => "system:ping",
            Self::Unknown(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for WebhookEvent {
    fn from(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == value)
            .unwrap_or_else(|| Self::Unknown(value.to_owned()))
    }
}

impl From<String> for WebhookEvent {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<WebhookEvent> for String {
    fn from(value: WebhookEvent) -> Self {
        match value {
            WebhookEvent::Unknown(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WebhookEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WebhookEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}

/// Returns `true` if `event` names a supported webhook event.
pub fn is_valid_webhook_event(event: &str) -> bool {
    WebhookEvent::from(event).is_known()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Webhook registration.
pub struct Webhook {
    /// Server-assigned when empty; registering an existing id replaces it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Restricts the webhook to one device; applies to all devices when `None`.
    #[serde(default)]
    pub device_id: Option<String>,
    pub url: String,
    pub event: WebhookEvent,
}

impl Webhook {
    pub fn new(url: impl Into<String>, event: WebhookEvent) -> Self {
        Self {
            id: String::new(),
            device_id: None,
            url: url.into(),
            event,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn for_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Check the event is supported and the URL uses `https://` (case-insensitive).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.event.is_known() {
            return Err(ValidationError::InvalidWebhookEvent {
                event: self.event.to_string(),
            });
        }

        let secure = self
            .url
            .get(..8)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"));
        if !secure {
            return Err(ValidationError::InsecureUrl {
                url: self.url.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_round_trip() {
        for event in WebhookEvent::ALL {
            assert_eq!(WebhookEvent::from(event.as_str()), event);
            assert!(is_valid_webhook_event(event.as_str()));
        }
        assert!(!is_valid_webhook_event("invalid:event"));
        assert_eq!(
            WebhookEvent::from("mms:received"),
            WebhookEvent::Unknown("mms:received".to_owned())
        );
    }

    #[test]
    fn validate_requires_known_event() {
        let hook = Webhook::new(
            "https://example.com/hook",
            WebhookEvent::from("invalid:event"),
        );
        assert!(matches!(
            hook.validate(),
            Err(ValidationError::InvalidWebhookEvent { .. })
        ));
    }

    #[test]
    fn validate_requires_https_in_any_case() {
        for url in [
            "https://example.com/hook",
            "HTTPS://example.com/hook",
            "HttPs://example.com",
        ] {
            assert!(
                Webhook::new(url, WebhookEvent::SmsReceived)
                    .validate()
                    .is_ok(),
                "{url}"
            );
        }

        for url in [
            "http://example.com/hook",
            "HTTP://example.com/hook",
            "ftp://example.com",
            "https:/x",
            "",
            "été://x",
        ] {
            assert!(
                matches!(
                    Webhook::new(url, WebhookEvent::SmsReceived).validate(),
                    Err(ValidationError::InsecureUrl { .. })
                ),
                "{url}"
            );
        }
    }

    #[test]
    fn serializes_device_id_as_null_and_omits_empty_id() {
        let hook = Webhook::new("https://example.com", WebhookEvent::SmsSent);
        assert_eq!(
            serde_json::to_string(&hook).unwrap(),
            r#"{"deviceId":null,"url":"https://example.com","event":"sms:sent"}"#
        );

        let hook = hook.with_id("123").for_device("dev");
        let decoded: Webhook =
            serde_json::from_str(&serde_json::to_string(&hook).unwrap()).unwrap();
        assert_eq!(decoded, hook);
    }
}
