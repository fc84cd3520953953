//! Query → route → advisory pipeline.

use chrono::{DateTime, Utc};
use tracing::debug;

use wayfarer_core::config::AdvisoryConfig;
use wayfarer_core::types::{AdvisoryRecord, ExtractedRoute, Query, RouteHints};

use crate::error::AdvisoryError;
use crate::interpreter::{Interpreter, MatchKind};
use crate::synthesizer;

/// Stateless advisory pipeline shared by every caller.
///
/// Explicit hints override what the interpreter extracted: a hinted
/// destination replaces the extracted one, and a hinted origin replaces the
/// extracted origin.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryEngine {
    interpreter: Interpreter,
}

impl AdvisoryEngine {
    pub fn new(config: &AdvisoryConfig) -> Self {
        Self {
            interpreter: Interpreter::new(config.fallback),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Resolve the route for a query, applying any explicit hints.
    pub fn resolve_route(&self, query: &Query, hints: &RouteHints) -> ExtractedRoute {
        let (extracted, kind) = self.interpreter.interpret_with_kind(query);

        let route = ExtractedRoute {
            origin: hints
                .origin()
                .map(str::to_string)
                .or(extracted.origin),
            destination: hints
                .destination()
                .map(str::to_string)
                .unwrap_or(extracted.destination),
        };

        debug!(
            match_kind = %kind,
            hinted = hints.destination().is_some() || hints.origin().is_some(),
            destination = %route.destination,
            origin = ?route.origin,
            "Route resolved"
        );
        if kind == MatchKind::Fallback && hints.destination().is_none() {
            debug!(policy = ?self.interpreter.fallback(), "No route pattern matched");
        }

        route
    }

    /// Produce an advisory record for the query, stamped with the current time.
    pub fn advise(
        &self,
        query: &Query,
        hints: &RouteHints,
    ) -> Result<AdvisoryRecord, AdvisoryError> {
        self.advise_at(query, hints, Utc::now())
    }

    /// Produce an advisory record stamped with `at`.
    pub fn advise_at(
        &self,
        query: &Query,
        hints: &RouteHints,
        at: DateTime<Utc>,
    ) -> Result<AdvisoryRecord, AdvisoryError> {
        let route = self.resolve_route(query, hints);
        if route.destination.is_empty() {
            return Err(AdvisoryError::EmptyDestination {
                query: query.to_string(),
            });
        }
        Ok(synthesizer::synthesize_at(
            &route.destination,
            route.origin.as_deref(),
            at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wayfarer_core::types::FallbackPolicy;

    fn engine() -> AdvisoryEngine {
        AdvisoryEngine::new(&AdvisoryConfig::default())
    }

    fn q(text: &str) -> Query {
        Query::parse(text).unwrap()
    }

    fn hints(destination: Option<&str>, origin: Option<&str>) -> RouteHints {
        RouteHints::new(
            destination.map(str::to_string),
            origin.map(str::to_string),
        )
    }

    #[test]
    fn test_round_trip_from_query_to_record() {
        let record = engine()
            .advise(&q("travel from USA to Japan"), &RouteHints::default())
            .unwrap();
        assert_eq!(record.destination, "Japan");
        assert_eq!(record.origin.as_deref(), Some("USA"));
        assert_eq!(
            record.embassy_information.as_deref(),
            Some("Japan Embassy can be contacted at embassy@japan.gov")
        );
    }

    #[test]
    fn test_hint_destination_overrides_extraction() {
        let route = engine().resolve_route(
            &q("travel from USA to Japan"),
            &hints(Some(" South Korea "), None),
        );
        assert_eq!(route.destination, "South Korea");
        assert_eq!(route.origin.as_deref(), Some("USA"));
    }

    #[test]
    fn test_hint_origin_overrides_extraction() {
        let route = engine().resolve_route(
            &q("travel from USA to Japan"),
            &hints(None, Some("Canada")),
        );
        assert_eq!(route.destination, "Japan");
        assert_eq!(route.origin.as_deref(), Some("Canada"));
    }

    #[test]
    fn test_hints_replace_fallback() {
        let route = engine().resolve_route(&q("visa rules?"), &hints(Some("Peru"), Some("")));
        assert_eq!(route.destination, "Peru");
        assert_eq!(route.origin, None);
    }

    #[test]
    fn test_blank_hints_are_ignored() {
        let route = engine().resolve_route(&q("Going to France"), &hints(Some("   "), Some(" ")));
        assert_eq!(route.destination, "France");
        assert_eq!(route.origin, None);
    }

    #[test]
    fn test_placeholder_policy_from_config() {
        let config = AdvisoryConfig {
            fallback: FallbackPolicy::Placeholder,
        };
        let engine = AdvisoryEngine::new(&config);
        let record = engine.advise(&q("Paris"), &RouteHints::default()).unwrap();
        assert_eq!(record.destination, "Unknown destination");
        assert_eq!(
            record.embassy_information.as_deref(),
            Some("Unknown destination Embassy can be contacted at embassy@unknowndestination.gov")
        );
    }

    #[test]
    fn test_raw_query_policy_by_default() {
        let record = engine().advise(&q("  Paris "), &RouteHints::default()).unwrap();
        assert_eq!(record.destination, "Paris");
        assert_eq!(record.origin, None);
    }

    #[test]
    fn test_advise_at_is_fully_deterministic() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let query = q("from Ghana to Senegal");
        let a = engine().advise_at(&query, &RouteHints::default(), at).unwrap();
        let b = engine().advise_at(&query, &RouteHints::default(), at).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.timestamp, "2026-10-18T00:00:00.000Z");
    }
}
