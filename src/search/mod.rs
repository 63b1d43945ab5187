//! Retrieval planning for the vector store
//!
//! - Deterministic filter builders, one per namespace
//! - Stage-aware search plans over those filters

mod filter;
mod plan;

pub use filter::*;
pub use plan::*;
