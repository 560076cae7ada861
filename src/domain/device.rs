use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// A device registered on the account. All timestamps are server-assigned; missing ones
/// decode as the Unix epoch.
pub struct Device {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_seen: DateTime<Utc>,
}

impl Device {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the device checked in no earlier than `hours` before `now`.
    pub fn active_within(&self, hours: u32, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_seen) <= chrono::Duration::hours(i64::from(hours))
    }
}
