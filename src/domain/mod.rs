//! Domain layer: wire DTOs and their validation rules (no I/O).

mod device;
mod message;
mod push;
mod request;
mod response;
mod settings;
mod validation;
mod value;
mod webhook;

pub use device::Device;
pub use message::{
    DataMessage, MESSAGE_ID_MAX_LEN, MESSAGE_MAX_RECIPIENTS, MESSAGE_MIN_TTL_SECONDS, Message,
    MessageState, PHONE_NUMBER_MAX_LEN, ProcessingState, RecipientState, SIM_NUMBER_MAX,
    TextMessage,
};
pub use push::{PushEventType, PushNotification, UpstreamPushRequest};
pub use request::{DEVICE_ID_MAX_LEN, MessagesExportRequest, SendOptions, TokenRequest};
pub use response::{
    ErrorResponse, HealthCheck, HealthResponse, HealthStatus, LogEntry, LogEntryPriority,
    TokenResponse,
};
pub use settings::{
    DeviceSettings, LimitPeriod, SettingsEncryption, SettingsLogs, SettingsMessages,
    SettingsPing, SettingsWebhooks, SimSelectionMode,
};
pub use validation::ValidationError;
pub use value::{MessagePriority, PhoneNumber};
pub use webhook::{Webhook, WebhookEvent, is_valid_webhook_event};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_phone_number_feeds_message_constructor() {
        let phone = PhoneNumber::parse(Some(phonenumber::country::Id::US), "(650) 253-0000")
            .unwrap();
        let msg = Message::text("hello", [phone]).unwrap();
        assert_eq!(msg.phone_numbers, vec!["+16502530000".to_owned()]);
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn every_validated_dto_reports_a_validation_error() {
        let errors: Vec<ValidationError> = vec![
            Message::default().validate().unwrap_err(),
            Webhook::new("http://example.com", WebhookEvent::SmsSent)
                .validate()
                .unwrap_err(),
            TokenRequest::default().validate().unwrap_err(),
            DeviceSettings {
                messages: Some(SettingsMessages {
                    send_interval_min: Some(3),
                    send_interval_max: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            }
            .validate()
            .unwrap_err(),
        ];
        assert!(errors.iter().all(|err| !err.to_string().is_empty()));
    }
}
