use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WayfarerError};

/// Message returned to callers that submit an empty or missing query.
pub const EMPTY_QUERY_MESSAGE: &str = "Query is required and must be a non-empty string";

/// Destination used by [`FallbackPolicy::Placeholder`].
pub const UNKNOWN_DESTINATION: &str = "Unknown destination";

// =============================================================================
// Enums
// =============================================================================

/// What the interpreter does when no route pattern matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Use the whole trimmed query as the destination.
    #[default]
    RawQuery,
    /// Use the literal `"Unknown destination"`.
    Placeholder,
}

// =============================================================================
// Query
// =============================================================================

/// A validated, trimmed free-text travel question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Validate raw user input.
    ///
    /// Rejects input that is empty after trimming with
    /// [`WayfarerError::InvalidInput`].
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WayfarerError::InvalidInput(EMPTY_QUERY_MESSAGE.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Origin/destination pair extracted from a query.
///
/// `destination` is never empty; `origin` is only present when the query
/// named one explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRoute {
    pub origin: Option<String>,
    pub destination: String,
}

/// Explicit origin/destination supplied alongside a query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHints {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl RouteHints {
    pub fn new(destination: Option<String>, origin: Option<String>) -> Self {
        Self {
            destination,
            origin,
        }
    }

    /// Explicit destination, ignoring blank values.
    pub fn destination(&self) -> Option<&str> {
        non_blank(self.destination.as_deref())
    }

    /// Explicit origin, ignoring blank values.
    pub fn origin(&self) -> Option<&str> {
        non_blank(self.origin.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Advisory records
// =============================================================================

/// Synthesized travel advisory for a destination.
///
/// Field names serialize in camelCase to keep the wire shape used by
/// existing clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRecord {
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub visa_requirements: String,
    pub documents: Vec<String>,
    pub advisories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_processing_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embassy_information: Option<String>,
    /// ISO-8601 UTC timestamp taken when the record was synthesized.
    pub timestamp: String,
}

/// A persisted query together with the advisory it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub query: String,
    pub destination: String,
    #[serde(default)]
    pub origin: Option<String>,
    pub response: AdvisoryRecord,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AdvisoryRecord {
        AdvisoryRecord {
            destination: "Japan".to_string(),
            origin: None,
            visa_requirements: "Tourist visa required for stays up to 90 days in Japan"
                .to_string(),
            documents: vec!["Valid passport".to_string()],
            advisories: vec!["Carry copies".to_string()],
            estimated_processing_time: None,
            embassy_information: Some("Japan Embassy".to_string()),
            timestamp: "2026-10-18T09:30:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_query_parse_trims() {
        let q = Query::parse("   travel to Peru  \n").unwrap();
        assert_eq!(q.as_str(), "travel to Peru");
        assert_eq!(q.to_string(), "travel to Peru");
    }

    #[test]
    fn test_query_parse_rejects_empty() {
        for raw in ["", "   ", "\t\n"] {
            let err = Query::parse(raw).unwrap_err();
            match err {
                WayfarerError::InvalidInput(msg) => assert_eq!(msg, EMPTY_QUERY_MESSAGE),
                other => panic!("Expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_route_hints_ignore_blank_values() {
        let hints = RouteHints::new(Some("  ".to_string()), Some(" Canada ".to_string()));
        assert_eq!(hints.destination(), None);
        assert_eq!(hints.origin(), Some("Canada"));
        assert_eq!(RouteHints::default().origin(), None);
    }

    #[test]
    fn test_advisory_record_serializes_camel_case() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(
            json["visaRequirements"],
            "Tourist visa required for stays up to 90 days in Japan"
        );
        assert_eq!(json["embassyInformation"], "Japan Embassy");
        assert!(json.get("visa_requirements").is_none());
    }

    #[test]
    fn test_advisory_record_omits_absent_fields() {
        let json = serde_json::to_value(sample_record()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("origin"));
        assert!(!obj.contains_key("estimatedProcessingTime"));
    }

    #[test]
    fn test_advisory_record_accepts_missing_optionals() {
        let json = r#"{
            "destination": "Peru",
            "visaRequirements": "none",
            "documents": [],
            "advisories": [],
            "timestamp": "2026-10-18T09:30:00.000Z"
        }"#;
        let record: AdvisoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.origin, None);
        assert_eq!(record.embassy_information, None);
    }

    #[test]
    fn test_fallback_policy_serde() {
        assert_eq!(
            serde_json::to_string(&FallbackPolicy::RawQuery).unwrap(),
            "\"raw_query\""
        );
        let p: FallbackPolicy = serde_json::from_str("\"placeholder\"").unwrap();
        assert_eq!(p, FallbackPolicy::Placeholder);
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::RawQuery);
    }
}
