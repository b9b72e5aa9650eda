//! Fallback policy shared by every external-service boundary.
//!
//! Adapters never hand a failure to the interview session. Each call site
//! resolves to a `Resolved<T>`: either the real value, or a fixed substitute
//! tagged with the `Degradation` that caused it. Degradations are logged and
//! returned to the client as notices.

use serde::Serialize;
use tracing::warn;

/// Why a fallback value replaced the adapter's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum Degradation {
    /// The adapter has no credentials configured.
    ConfigurationMissing(String),
    /// The adapter was unreachable, errored, or timed out.
    ServiceUnavailable(String),
    /// The adapter answered with content that could not be decoded.
    MalformedResponse(String),
}

impl Degradation {
    /// One-line notice suitable for a UI banner.
    pub fn notice(&self, feature: &str) -> String {
        match self {
            Degradation::ConfigurationMissing(what) => {
                format!("{feature}: {what} not configured, using fallback")
            }
            Degradation::ServiceUnavailable(reason) => {
                format!("{feature}: service unavailable ({reason}), using fallback")
            }
            Degradation::MalformedResponse(reason) => {
                format!("{feature}: unreadable response ({reason}), using fallback")
            }
        }
    }
}

/// A value that is always usable, optionally flagged as a fallback.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub degradation: Option<Degradation>,
}

impl<T> Resolved<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            degradation: None,
        }
    }

    /// Substitutes `value` and logs why.
    pub fn fallback(value: T, degradation: Degradation, feature: &str) -> Self {
        warn!("{}", degradation.notice(feature));
        Self {
            value,
            degradation: Some(degradation),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    /// Pushes this value's notice (if any) onto `notices` and returns the value.
    pub fn collect_notice(self, feature: &str, notices: &mut Vec<String>) -> T {
        if let Some(degradation) = &self.degradation {
            notices.push(degradation.notice(feature));
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_value_has_no_notice() {
        let mut notices = Vec::new();
        let value = Resolved::live(7).collect_notice("Scoring", &mut notices);
        assert_eq!(value, 7);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_fallback_value_pushes_notice() {
        let mut notices = Vec::new();
        let resolved = Resolved::fallback(
            "default",
            Degradation::ServiceUnavailable("timeout".to_string()),
            "Question generation",
        );
        assert!(resolved.is_degraded());
        let value = resolved.collect_notice("Question generation", &mut notices);
        assert_eq!(value, "default");
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("timeout"));
    }

    #[test]
    fn test_degradation_serializes_with_kind_tag() {
        let json = serde_json::to_value(Degradation::MalformedResponse("bad json".into())).unwrap();
        assert_eq!(json["kind"], "MalformedResponse");
        assert_eq!(json["detail"], "bad json");
    }
}
