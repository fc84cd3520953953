//! Route extraction from free-text travel questions.
//!
//! Two patterns are tried in order and the first match wins:
//!
//! 1. `from|travel from|traveling from <A> to|visit|visiting <B>` yields
//!    both an origin and a destination.
//! 2. `to|visit|visiting <B>` yields a destination only.
//!
//! Captures are runs of ASCII letters and whitespace, so names with digits,
//! hyphens, apostrophes or accents are cut short ("Côte d'Ivoire" becomes
//! "C"). When neither pattern yields a non-empty destination the configured
//! [`FallbackPolicy`] decides what the destination is.

use std::sync::LazyLock;

use regex::Regex;

use wayfarer_core::types::{ExtractedRoute, FallbackPolicy, Query, UNKNOWN_DESTINATION};

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

static ORIGIN_DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:from|travel(?:ing)? from)\s+([a-zA-Z\s]+)\s+(?:to|visit(?:ing)?)\s+([a-zA-Z\s]+)",
    )
    .expect("Invalid origin/destination regex")
});

static DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:to|visit(?:ing)?)\s+([a-zA-Z\s]+)").expect("Invalid destination regex")
});

/// Which rule produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// "from A to B" matched.
    OriginAndDestination,
    /// Only "to B" matched.
    DestinationOnly,
    /// Nothing usable matched; the fallback policy supplied the destination.
    Fallback,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchKind::OriginAndDestination => "origin_and_destination",
            MatchKind::DestinationOnly => "destination_only",
            MatchKind::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Run the route patterns against `text` without applying any fallback.
///
/// Returns `None` when no pattern produced a non-empty destination. An
/// origin that trims to nothing is reported as absent.
pub fn extract_route(text: &str) -> Option<(ExtractedRoute, MatchKind)> {
    if let Some(caps) = ORIGIN_DESTINATION_RE.captures(text) {
        let origin = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let destination = caps.get(2).map_or("", |m| m.as_str()).trim();
        if !destination.is_empty() {
            return Some((
                ExtractedRoute {
                    origin,
                    destination: destination.to_string(),
                },
                MatchKind::OriginAndDestination,
            ));
        }
        // Origin clause present but destination blank: only the origin
        // survives into the fallback.
        return origin.map(|origin| {
            (
                ExtractedRoute {
                    origin: Some(origin),
                    destination: String::new(),
                },
                MatchKind::Fallback,
            )
        });
    }

    let caps = DESTINATION_RE.captures(text)?;
    let destination = caps.get(1).map_or("", |m| m.as_str()).trim();
    if destination.is_empty() {
        return None;
    }
    Some((
        ExtractedRoute {
            origin: None,
            destination: destination.to_string(),
        },
        MatchKind::DestinationOnly,
    ))
}

/// Turns validated queries into routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    fallback: FallbackPolicy,
}

impl Interpreter {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Extract a route, applying the fallback policy when needed.
    ///
    /// The returned destination is never empty.
    pub fn interpret(&self, query: &Query) -> ExtractedRoute {
        self.interpret_with_kind(query).0
    }

    /// Like [`interpret`](Self::interpret) but also reports which rule fired.
    pub fn interpret_with_kind(&self, query: &Query) -> (ExtractedRoute, MatchKind) {
        match extract_route(query.as_str()) {
            Some((route, kind)) if !route.destination.is_empty() => (route, kind),
            partial => {
                let origin = partial.and_then(|(route, _)| route.origin);
                let route = ExtractedRoute {
                    origin,
                    destination: self.fallback_destination(query),
                };
                (route, MatchKind::Fallback)
            }
        }
    }

    fn fallback_destination(&self, query: &Query) -> String {
        match self.fallback {
            FallbackPolicy::RawQuery => query.as_str().to_string(),
            FallbackPolicy::Placeholder => UNKNOWN_DESTINATION.to_string(),
        }
    }
}
