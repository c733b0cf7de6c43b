//! The search subsystem: query parameters, single-dimension filter
//! selection, and the match/rank/cache/audit pipeline.

pub mod engine;
pub mod filter;

pub use engine::{SearchEngine, SearchHit, RESULT_CAP};
pub use filter::{FilterSelector, SearchParams};
