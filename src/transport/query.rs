use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::SendOptions;

/// Query keys are emitted in alphabetical order so the wire form is stable.
type QueryPairs = BTreeMap<&'static str, String>;

pub fn encode_send_options(options: &SendOptions) -> String {
    let mut pairs = QueryPairs::new();
    if let Some(skip) = options.skip_phone_validation() {
        pairs.insert(SendOptions::SKIP_PHONE_VALIDATION, skip.to_string());
    }
    if let Some(hours) = options.device_active_within() {
        pairs.insert(SendOptions::DEVICE_ACTIVE_WITHIN, hours.to_string());
    }
    encode_pairs(&pairs)
}

pub fn encode_logs_query(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let mut pairs = QueryPairs::new();
    pairs.insert("from", rfc3339(from));
    pairs.insert("to", rfc3339(to));
    encode_pairs(&pairs)
}

/// Append `query` to `path`, omitting the `?` when there is nothing to add.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn encode_pairs(pairs: &QueryPairs) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
