//! Advisory record synthesis.
//!
//! Fills the fixed advisory templates for a destination. No lookup against
//! real visa or embassy data takes place; the only input besides the route
//! is the wall clock.

use chrono::{DateTime, SecondsFormat, Utc};

use wayfarer_core::types::AdvisoryRecord;

/// Standard travel documents, in presentation order.
pub const STANDARD_DOCUMENTS: [&str; 6] = [
    "Valid passport with at least 6 months validity",
    "Completed visa application form",
    "Proof of accommodation",
    "Return flight ticket",
    "Travel insurance",
    "Proof of sufficient funds",
];

/// Standard travel advisories, in presentation order.
pub const STANDARD_ADVISORIES: [&str; 4] = [
    "Check local COVID-19 restrictions before travel",
    "Register with your embassy upon arrival",
    "Carry photocopies of important documents",
    "Be aware of local customs and regulations",
];

pub const STANDARD_PROCESSING_TIME: &str = "2-4 weeks for standard processing";

/// Build an advisory record stamped with the current time.
pub fn synthesize(destination: &str, origin: Option<&str>) -> AdvisoryRecord {
    synthesize_at(destination, origin, Utc::now())
}

/// Build an advisory record stamped with `at`.
///
/// `destination` must be non-empty; route resolution guarantees this.
pub fn synthesize_at(destination: &str, origin: Option<&str>, at: DateTime<Utc>) -> AdvisoryRecord {
    debug_assert!(!destination.is_empty(), "destination must not be empty");

    AdvisoryRecord {
        destination: destination.to_string(),
        origin: origin.map(str::to_string),
        visa_requirements: format!(
            "Tourist visa required for stays up to 90 days in {}",
            destination
        ),
        documents: STANDARD_DOCUMENTS.iter().map(|s| s.to_string()).collect(),
        advisories: STANDARD_ADVISORIES.iter().map(|s| s.to_string()).collect(),
        estimated_processing_time: Some(STANDARD_PROCESSING_TIME.to_string()),
        embassy_information: Some(format!(
            "{} Embassy can be contacted at embassy@{}.gov",
            destination,
            embassy_slug(destination)
        )),
        timestamp: format_timestamp(at),
    }
}

/// Lower-cased destination with all whitespace removed.
pub fn embassy_slug(destination: &str) -> String {
    destination
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-18T09:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
