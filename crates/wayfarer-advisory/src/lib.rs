//! Advisory engine for Wayfarer.
//!
//! Extracts an origin/destination route from a free-text travel question
//! and fills the advisory templates for that destination.

pub mod engine;
pub mod error;
pub mod interpreter;
pub mod synthesizer;

pub use engine::AdvisoryEngine;
pub use error::AdvisoryError;
pub use interpreter::{extract_route, Interpreter, MatchKind};
pub use synthesizer::{synthesize, synthesize_at};
