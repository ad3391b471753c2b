use serde::Serialize;

/// Everything that can end a lookup without a result.
///
/// Each variant renders as the single message shown to the user; none of
/// them is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LookupError {
    /// The place name was empty or whitespace only.
    #[error("Please enter a place name")]
    Validation,

    /// The service has no data for the requested location.
    #[error("{0}")]
    NotFound(String),

    /// The service answered with a failure of its own.
    #[error("{0}")]
    Service(String),

    /// The request never produced a usable answer (network or geolocation).
    #[error("{0}")]
    Transport(String),
}

impl LookupError {
    /// Short machine-friendly name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Validation => "validation",
            LookupError::NotFound(_) => "not_found",
            LookupError::Service(_) => "service",
            LookupError::Transport(_) => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_shown_verbatim() {
        let err = LookupError::Service("Invalid API key".into());
        assert_eq!(err.to_string(), "Invalid API key");

        let err = LookupError::NotFound("city not found".into());
        assert_eq!(err.to_string(), "city not found");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(LookupError::Transport("offline".into())).unwrap();
        assert_eq!(json["kind"], "transport");
        assert_eq!(json["message"], "offline");

        let json = serde_json::to_value(LookupError::Validation).unwrap();
        assert_eq!(json["kind"], "validation");
    }
}
