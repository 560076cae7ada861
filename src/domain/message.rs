use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessagePriority, check_length};

pub const MESSAGE_MAX_RECIPIENTS: usize = 100;
pub const PHONE_NUMBER_MAX_LEN: usize = 128;
pub const MESSAGE_ID_MAX_LEN: usize = 36;
pub const MESSAGE_MIN_TTL_SECONDS: u64 = 5;
pub const SIM_NUMBER_MAX: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Coarse processing state of a message or of a single recipient.
pub enum ProcessingState {
    #[default]
    Pending,
    /// Received by the device.
    Processed,
    Sent,
    Delivered,
    Failed,
}

impl ProcessingState {
    /// Every state the gateway reports, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processed,
        Self::Sent,
        Self::Delivered,
        Self::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processed => "Processed",
            Self::Sent => "Sent",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
        }
    }

    /// Returns `true` once no further transitions are expected.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidState {
                state: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Plain text SMS body.
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Binary (data) SMS payload addressed to an application port.
pub struct DataMessage {
    /// Base64-encoded payload.
    pub data: String,
    /// Destination port.
    pub port: u16,
}

impl DataMessage {
    /// Wire field name for the destination port.
    pub const PORT_FIELD: &'static str = "port";

    /// Encode `payload` as base64 and address it to `port` (which must be non-zero).
    pub fn from_bytes(payload: &[u8], port: u16) -> Result<Self, ValidationError> {
        if port == 0 {
            return Err(ValidationError::OutOfRange {
                field: Self::PORT_FIELD,
                min: 1,
                max: i64::from(u16::MAX),
                actual: 0,
            });
        }
        Ok(Self {
            data: STANDARD.encode(payload),
            port,
        })
    }

    /// Decode the base64 payload.
    pub fn payload(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Outgoing message.
///
/// Invariants checked by [`Message::validate`]:
/// - exactly one of `message` (legacy), `text_message`, `data_message` is set,
/// - `ttl` and `valid_until` are not both set.
///
/// The validated constructors additionally enforce the recipient limits.
pub struct Message {
    /// Message id; generated by the server when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Legacy plain text content. Prefer `text_message`.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_message: Option<TextMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_message: Option<DataMessage>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_encrypted: bool,
    /// SIM slot (1-3); the device default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_delivery_report: Option<bool>,
    #[serde(default, skip_serializing_if = "MessagePriority::is_default")]
    pub priority: MessagePriority,
    /// Time to live in seconds. Conflicts with `valid_until`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Absolute expiry. Conflicts with `ttl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl Message {
    /// Wire field name for recipients.
    pub const RECIPIENTS_FIELD: &'static str = "phoneNumbers";

    /// Create a text message for `phone_numbers` (1-100 recipients, 1-128 chars each).
    pub fn text<I, S>(text: impl Into<String>, phone_numbers: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phone_numbers = collect_recipients(phone_numbers)?;
        Ok(Self {
            text_message: Some(TextMessage::new(text)),
            phone_numbers,
            ..Default::default()
        })
    }

    /// Create a data message for `phone_numbers` (1-100 recipients, 1-128 chars each).
    pub fn data<I, S>(data: DataMessage, phone_numbers: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phone_numbers = collect_recipients(phone_numbers)?;
        Ok(Self {
            data_message: Some(data),
            phone_numbers,
            ..Default::default()
        })
    }

    /// Set a client-chosen message id (at most 36 chars).
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        check_length("id", &id, MESSAGE_ID_MAX_LEN)?;
        self.id = Some(id);
        Ok(self)
    }

    /// Set the time to live in seconds (at least 5).
    pub fn with_ttl(mut self, seconds: u64) -> Result<Self, ValidationError> {
        if seconds < MESSAGE_MIN_TTL_SECONDS {
            return Err(ValidationError::OutOfRange {
                field: "ttl",
                min: MESSAGE_MIN_TTL_SECONDS as i64,
                max: i64::MAX,
                actual: i64::try_from(seconds).unwrap_or(i64::MAX),
            });
        }
        self.ttl = Some(seconds);
        Ok(self)
    }

    pub fn with_valid_until(mut self, valid_until: DateTime<Utc>) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    /// Select the SIM slot (1-3).
    pub fn with_sim_number(mut self, sim_number: u8) -> Result<Self, ValidationError> {
        if !(1..=SIM_NUMBER_MAX).contains(&sim_number) {
            return Err(ValidationError::OutOfRange {
                field: "simNumber",
                min: 1,
                max: i64::from(SIM_NUMBER_MAX),
                actual: i64::from(sim_number),
            });
        }
        self.sim_number = Some(sim_number);
        Ok(self)
    }

    pub fn with_delivery_report(mut self, enabled: bool) -> Self {
        self.with_delivery_report = Some(enabled);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<MessagePriority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Mark the content as already encrypted with the device passphrase.
    pub fn encrypted(mut self) -> Self {
        self.is_encrypted = true;
        self
    }

    /// The text content, falling back to the legacy `message` field.
    pub fn text_message(&self) -> Option<TextMessage> {
        if let Some(text) = &self.text_message {
            return Some(text.clone());
        }
        self.message
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(TextMessage::new)
    }

    pub fn data_message(&self) -> Option<&DataMessage> {
        self.data_message.as_ref()
    }

    /// Check content exclusivity and expiry exclusivity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let filled = [
            !is_blank(&self.message),
            self.text_message.is_some(),
            self.data_message.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();

        match filled {
            0 => return Err(ValidationError::MissingContent),
            1 => {}
            _ => {
                return Err(ValidationError::ConflictingFields {
                    fields: "must specify exactly one of: textMessage or dataMessage",
                });
            }
        }

        if self.ttl.is_some() && self.valid_until.is_some() {
            return Err(ValidationError::ConflictingFields {
                fields: "ttl and validUntil",
            });
        }

        Ok(())
    }
}

fn collect_recipients<I, S>(phone_numbers: I) -> Result<Vec<String>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let phone_numbers = phone_numbers
        .into_iter()
        .map(Into::into)
        .collect::<Vec<String>>();

    if phone_numbers.is_empty() {
        return Err(ValidationError::Empty {
            field: Message::RECIPIENTS_FIELD,
        });
    }
    if phone_numbers.len() > MESSAGE_MAX_RECIPIENTS {
        return Err(ValidationError::TooManyRecipients {
            max: MESSAGE_MAX_RECIPIENTS,
            actual: phone_numbers.len(),
        });
    }
    for phone in &phone_numbers {
        check_length(Message::RECIPIENTS_FIELD, phone, PHONE_NUMBER_MAX_LEN)?;
    }
    Ok(phone_numbers)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientState {
    /// Phone number, or the first 16 symbols of its SHA256 hash when hashed.
    pub phone_number: String,
    pub state: ProcessingState,
    /// Failure reason, set for the `Failed` state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Server-side state of a message.
pub struct MessageState {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub state: ProcessingState,
    pub is_hashed: bool,
    pub is_encrypted: bool,
    pub recipients: Vec<RecipientState>,
    /// State name to the time the message entered it.
    pub states: HashMap<String, DateTime<Utc>>,
}

impl MessageState {
    /// Check that every history key names a known [`ProcessingState`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for key in self.states.keys() {
            key.parse::<ProcessingState>()?;
        }
        Ok(())
    }

    /// When the message entered `state`, if it did.
    pub fn entered_at(&self, state: ProcessingState) -> Option<DateTime<Utc>> {
        self.states.get(state.as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn text() -> Option<TextMessage> {
        Some(TextMessage::new("Hello World!"))
    }

    fn data() -> Option<DataMessage> {
        Some(DataMessage {
            data: "SGVsbG8gV29ybGQh".to_owned(),
            port: 1,
        })
    }

    fn base() -> Message {
        Message {
            phone_numbers: vec!["1234567890".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_exactly_one_content_field() {
        let legacy = Message {
            message: Some("Hello World!".to_owned()),
            ..base()
        };
        assert_eq!(legacy.validate(), Ok(()));

        let structured = Message {
            text_message: text(),
            ..base()
        };
        assert_eq!(structured.validate(), Ok(()));

        let binary = Message {
            data_message: data(),
            ..base()
        };
        assert_eq!(binary.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_content() {
        assert_eq!(base().validate(), Err(ValidationError::MissingContent));

        let empty_legacy = Message {
            message: Some(String::new()),
            ..base()
        };
        assert_eq!(empty_legacy.validate(), Err(ValidationError::MissingContent));
    }

    #[test]
    fn validate_allows_empty_structured_bodies() {
        let empty_text = Message {
            text_message: Some(TextMessage::new("")),
            ..base()
        };
        assert!(empty_text.validate().is_ok());

        let empty_data = Message {
            data_message: Some(DataMessage {
                data: String::new(),
                port: 1,
            }),
            ..base()
        };
        assert!(empty_data.validate().is_ok());
    }

    #[test]
    fn validate_rejects_multiple_content_fields() {
        let combos = [
            (Some("Hello".to_owned()), text(), None),
            (Some("Hello".to_owned()), None, data()),
            (None, text(), data()),
            (Some("Hello".to_owned()), text(), data()),
        ];
        for (message, text_message, data_message) in combos {
            let msg = Message {
                message,
                text_message,
                data_message,
                ..base()
            };
            let err = msg.validate().unwrap_err();
            assert!(err.is_conflict(), "unexpected error: {err:?}");
        }
    }

    #[test]
    fn validate_rejects_ttl_with_valid_until() {
        let msg = Message {
            text_message: text(),
            ttl: Some(3600),
            ..base()
        };
        assert!(msg.validate().is_ok());

        let msg = Message {
            text_message: text(),
            valid_until: Some(Utc::now() + Duration::hours(1)),
            ..base()
        };
        assert!(msg.validate().is_ok());

        let msg = Message {
            text_message: text(),
            ttl: Some(3600),
            valid_until: Some(Utc::now() + Duration::hours(1)),
            ..base()
        };
        assert_eq!(
            msg.validate(),
            Err(ValidationError::ConflictingFields {
                fields: "ttl and validUntil"
            })
        );
    }

    #[test]
    fn text_message_falls_back_to_legacy_field() {
        let msg = Message {
            message: Some("Hello World!".to_owned()),
            ..base()
        };
        assert_eq!(msg.text_message(), text());

        let msg = Message {
            text_message: text(),
            ..base()
        };
        assert_eq!(msg.text_message(), text());
        assert_eq!(base().text_message(), None);
        assert_eq!(base().data_message(), None);
    }

    #[test]
    fn constructors_enforce_recipient_limits() {
        assert!(matches!(
            Message::text("hi", Vec::<String>::new()),
            Err(ValidationError::Empty { .. })
        ));

        let many = vec!["+1234567890"; MESSAGE_MAX_RECIPIENTS + 1];
        assert!(matches!(
            Message::text("hi", many),
            Err(ValidationError::TooManyRecipients { max: 100, actual: 101 })
        ));

        let long = "1".repeat(PHONE_NUMBER_MAX_LEN + 1);
        assert!(matches!(
            Message::text("hi", [long]),
            Err(ValidationError::TooLong { .. })
        ));

        assert!(matches!(
            Message::text("hi", [""]),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn builder_methods_check_ranges() {
        let msg = Message::text("hi", ["+1234567890"]).unwrap();
        assert!(msg.clone().with_ttl(4).is_err());
        assert_eq!(msg.clone().with_ttl(5).unwrap().ttl, Some(5));
        assert!(msg.clone().with_sim_number(0).is_err());
        assert!(msg.clone().with_sim_number(4).is_err());
        assert_eq!(msg.clone().with_sim_number(3).unwrap().sim_number, Some(3));
        assert!(msg.clone().with_id("x".repeat(37)).is_err());
        assert!(msg.with_id("PyDmBQZZXYmyxMwED8Fzy").is_ok());
    }

    #[test]
    fn data_message_round_trips_payload() {
        let data = DataMessage::from_bytes(b"Hello World!", 53739).unwrap();
        assert_eq!(data.data, "SGVsbG8gV29ybGQh");
        assert_eq!(data.payload().unwrap(), b"Hello World!");
        assert!(DataMessage::from_bytes(b"x", 0).is_err());
    }

    #[test]
    fn serializes_only_set_fields() {
        let msg = Message::text("Hello World!", ["+1234567890"]).unwrap();
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"textMessage":{"text":"Hello World!"},"phoneNumbers":["+1234567890"]}"#
        );

        let msg = msg
            .with_priority(MessagePriority::BYPASS_THRESHOLD)
            .with_delivery_report(false)
            .with_ttl(86_400)
            .unwrap();
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["priority"], 100);
        assert_eq!(value["withDeliveryReport"], false);
        assert_eq!(value["ttl"], 86_400);
        assert!(value.get("isEncrypted").is_none());
    }

    #[test]
    fn processing_state_parses_known_names_only() {
        for state in ProcessingState::ALL {
            assert_eq!(state.as_str().parse::<ProcessingState>(), Ok(state));
        }
        assert!("pending".parse::<ProcessingState>().is_err());
        assert!(ProcessingState::Failed.is_final());
        assert!(!ProcessingState::Sent.is_final());
    }

    #[test]
    fn message_state_validate_checks_history_keys() {
        let mut state = MessageState::default();
        assert!(state.validate().is_ok());

        for s in ProcessingState::ALL {
            state.states.insert(s.as_str().to_owned(), Utc::now());
        }
        assert!(state.validate().is_ok());

        state.states.insert("InvalidState".to_owned(), Utc::now());
        assert_eq!(
            state.validate(),
            Err(ValidationError::InvalidState {
                state: "InvalidState".to_owned()
            })
        );
    }

    #[test]
    fn message_state_decodes_sparse_body() {
        let state: MessageState =
            serde_json::from_str(r#"{"id":"123","state":"Pending"}"#).unwrap();
        assert_eq!(state.id, "123");
        assert_eq!(state.state, ProcessingState::Pending);
        assert!(state.recipients.is_empty());

        let state: MessageState = serde_json::from_str(
            r#"{"id":"1","state":"Sent","recipients":[{"phoneNumber":"+1","state":"Failed","error":"timeout"}],"states":{"Sent":"2024-01-01T00:00:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(state.recipients[0].error.as_deref(), Some("timeout"));
        assert!(state.entered_at(ProcessingState::Sent).is_some());
        assert!(state.entered_at(ProcessingState::Delivered).is_none());
    }
}
