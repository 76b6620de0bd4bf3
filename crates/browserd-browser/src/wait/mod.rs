//! Bounded polling for element state, page text and URL conditions.

mod condition;
mod engine;

pub use condition::{ElementState, UrlMatch, WaitCondition};
pub use engine::{WaitEngine, WaitOutcome};
