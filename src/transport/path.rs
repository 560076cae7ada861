use crate::domain::ValidationError;

pub const MESSAGES: &str = "/messages";
pub const DEVICES: &str = "/devices";
pub const SETTINGS: &str = "/settings";
pub const WEBHOOKS: &str = "/webhooks";
pub const TOKEN: &str = "/auth/token";
pub const HEALTH: &str = "/health";
pub const LOGS: &str = "/logs";
pub const INBOX_EXPORT: &str = "/inbox/export";

const ID_FIELD: &str = "id";

pub fn message(id: &str) -> Result<String, ValidationError> {
    Ok(format!("{MESSAGES}/{}", segment(id)?))
}

pub fn device(id: &str) -> Result<String, ValidationError> {
    Ok(format!("{DEVICES}/{}", segment(id)?))
}

pub fn webhook(id: &str) -> Result<String, ValidationError> {
    Ok(format!("{WEBHOOKS}/{}", segment(id)?))
}

pub fn token(id: &str) -> Result<String, ValidationError> {
    Ok(format!("{TOKEN}/{}", segment(id)?))
}

/// Percent-encode `value` as one path segment.
///
/// Empty and dot segments are rejected: URL normalization would drop them (or climb a
/// level), so no encoding keeps them in place.
fn segment(value: &str) -> Result<String, ValidationError> {
    match value {
        "" => Err(ValidationError::Empty { field: ID_FIELD }),
        "." | ".." => Err(ValidationError::InvalidPathSegment {
            field: ID_FIELD,
            value: value.to_owned(),
        }),
        _ => Ok(urlencoding::encode(value).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_are_untouched() {
        assert_eq!(message("123").unwrap(), "/messages/123");
        assert_eq!(
            device("PyDmBQZZXYmyxMwED8Fzy").unwrap(),
            "/devices/PyDmBQZZXYmyxMwED8Fzy"
        );
        assert_eq!(webhook("a-b_c.d~e").unwrap(), "/webhooks/a-b_c.d~e");
        assert_eq!(token("abc123").unwrap(), "/auth/token/abc123");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(message("a/b").unwrap(), "/messages/a%2Fb");
        assert_eq!(webhook("x y?z").unwrap(), "/webhooks/x%20y%3Fz");
        assert_eq!(device("../settings").unwrap(), "/devices/..%2Fsettings");
        assert_eq!(token("...").unwrap(), "/auth/token/...");
    }

    #[test]
    fn dot_and_empty_segments_are_rejected() {
        for id in [".", ".."] {
            for built in [message(id), device(id), webhook(id), token(id)] {
                assert_eq!(
                    built,
                    Err(ValidationError::InvalidPathSegment {
                        field: "id",
                        value: id.to_owned(),
                    })
                );
            }
        }
        assert_eq!(device(""), Err(ValidationError::Empty { field: "id" }));
        assert_eq!(message(""), Err(ValidationError::Empty { field: "id" }));
    }
}
