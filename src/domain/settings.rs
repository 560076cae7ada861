use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Period over which `limit_value` applies.
pub enum LimitPeriod {
    Disabled,
    PerMinute,
    PerHour,
    PerDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// How the device picks a SIM card when the message does not name one.
pub enum SimSelectionMode {
    #[serde(rename = "OSDefault")]
    OsDefault,
    RoundRobin,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Device settings. Every group is optional; absent groups are left untouched by a
/// partial update.
pub struct DeviceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<SettingsEncryption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<SettingsMessages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<SettingsPing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<SettingsLogs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<SettingsWebhooks>,
}

impl DeviceSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.messages {
            Some(messages) => messages.validate(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsEncryption {
    /// Encryption is disabled when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsMessages {
    /// Minimum delay between sends, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_interval_min: Option<u32>,
    /// Maximum delay between sends, in seconds. Must be `>= send_interval_min`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_interval_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_period: Option<LimitPeriod>,
    /// Messages allowed per `limit_period`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_selection_mode: Option<SimSelectionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_lifetime_days: Option<u32>,
}

impl SettingsMessages {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.send_interval_min, self.send_interval_max) {
            if max < min {
                return Err(ValidationError::IntervalOrder { min, max });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsPing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsLogs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsWebhooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    /// Secret used to sign webhook payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(min: Option<u32>, max: Option<u32>) -> SettingsMessages {
        SettingsMessages {
            send_interval_min: min,
            send_interval_max: max,
            ..Default::default()
        }
    }

    #[test]
    fn interval_order_is_enforced_only_when_both_present() {
        assert!(intervals(None, None).validate().is_ok());
        assert!(intervals(Some(5), None).validate().is_ok());
        assert!(intervals(None, Some(1)).validate().is_ok());
        assert!(intervals(Some(2), Some(2)).validate().is_ok());
        assert!(intervals(Some(1), Some(10)).validate().is_ok());
        assert_eq!(
            intervals(Some(2), Some(1)).validate(),
            Err(ValidationError::IntervalOrder { min: 2, max: 1 })
        );
        assert!(intervals(Some(1), Some(0)).validate().is_err());
    }

    #[test]
    fn device_settings_delegates_to_messages() {
        assert!(DeviceSettings::default().validate().is_ok());

        let settings = DeviceSettings {
            messages: Some(intervals(Some(10), Some(5))),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn wire_names_are_snake_case_with_enum_literals() {
        let settings = DeviceSettings {
            messages: Some(SettingsMessages {
                limit_period: Some(LimitPeriod::PerHour),
                sim_selection_mode: Some(SimSelectionMode::OsDefault),
                send_interval_min: Some(1),
                ..Default::default()
            }),
            webhooks: Some(SettingsWebhooks {
                internet_required: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&settings).unwrap(),
            r#"{"messages":{"send_interval_min":1,"limit_period":"PerHour","sim_selection_mode":"OSDefault"},"webhooks":{"internet_required":true}}"#
        );

        let decoded: DeviceSettings =
            serde_json::from_str(r#"{"ping":{"interval_seconds":60},"logs":{"lifetime_days":7}}"#)
                .unwrap();
        assert_eq!(decoded.ping.unwrap().interval_seconds, Some(60));
        assert_eq!(decoded.logs.unwrap().lifetime_days, Some(7));
    }
}
