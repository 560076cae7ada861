use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Kind of push notification sent to a device.
pub enum PushEventType {
    MessageEnqueued,
    WebhooksUpdated,
    MessagesExportRequested,
    SettingsUpdated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Push notification addressed to a device token.
pub struct PushNotification {
    pub token: String,
    pub event: PushEventType,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl PushNotification {
    pub fn new(token: impl Into<String>, event: PushEventType) -> Self {
        Self {
            token: token.into(),
            event,
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Batch of push notifications as sent upstream.
pub type UpstreamPushRequest = Vec<PushNotification>;
