//! CrewDB - typed memory and retrieval contracts for sales crews
//!
//! Record schemas, tag conventions, namespace routing and stage-aware
//! search plans that sit between multi-agent sales crews and an external
//! vector + memory store.

pub mod error;
pub mod namespace;
pub mod records;
pub mod search;
pub mod tags;
pub mod types;

pub use error::{CrewDbError, Result};
pub use namespace::{Namespace, NAMESPACE_MAP};
pub use records::{MemoryRecord, VectorMetadata, VectorWriteBatch};
pub use search::{build_stage_search_plan, PlanRequest, StageSearchPlan};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
