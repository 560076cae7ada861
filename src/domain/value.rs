use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Message priority (`priority`).
///
/// The full `i8` range is valid. Messages at or above [`MessagePriority::BYPASS_THRESHOLD`]
/// skip the device's send limits and delays.
pub struct MessagePriority(i8);

impl MessagePriority {
    /// Lowest priority.
    pub const MINIMUM: Self = Self(i8::MIN);
    /// Priority used when none is given.
    pub const DEFAULT: Self = Self(0);
    /// Threshold at which messages bypass limits and delays.
    pub const BYPASS_THRESHOLD: Self = Self(100);
    /// Highest priority.
    pub const MAXIMUM: Self = Self(i8::MAX);

    pub fn new(value: i8) -> Self {
        Self(value)
    }

    pub fn value(self) -> i8 {
        self.0
    }

    /// Returns `true` if the gateway will skip throttling for this message.
    pub fn bypasses_limits(self) -> bool {
        self >= Self::BYPASS_THRESHOLD
    }

    pub(crate) fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl From<i8> for MessagePriority {
    fn from(value: i8) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// The gateway accepts free-form recipient strings; this type is an opt-in way to
/// normalize user input before building a [`Message`](crate::domain::Message).
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Wire field name for message recipients.
    pub const FIELD: &'static str = "phoneNumbers";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        if !phonenumber::is_valid(&parsed) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

/// Check that `value` is non-empty and at most `max` characters long.
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
