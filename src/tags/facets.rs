//! Facet recall recipes
//!
//! Fixed memory queries for the common lead-level recall intents. The
//! `priority_min` carried by each query is advisory: the memory facility may
//! only support exact priority matches, so callers filter after retrieval.

use serde::{Deserialize, Serialize};

use super::builder::MemoryTagFacets;
use crate::error::Result;
use crate::types::{MemoryEntity, MemoryKind, MemoryPriority, Stage};

/// Result limit shared by all recipes
pub const FACET_QUERY_LIMIT: usize = 10;

/// A tag-based memory list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryFacetQuery {
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_min: Option<MemoryPriority>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    FACET_QUERY_LIMIT
}

/// The named recall presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetRecipe {
    LeadPreferences,
    OpenObjections,
    NextSteps,
}

impl FacetRecipe {
    pub const ALL: [FacetRecipe; 3] = [
        FacetRecipe::LeadPreferences,
        FacetRecipe::OpenObjections,
        FacetRecipe::NextSteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetRecipe::LeadPreferences => "lead_preferences",
            FacetRecipe::OpenObjections => "open_objections",
            FacetRecipe::NextSteps => "next_steps",
        }
    }

    fn preset(&self) -> (MemoryKind, Stage, MemoryPriority) {
        match self {
            FacetRecipe::LeadPreferences => {
                (MemoryKind::Preference, Stage::Outreach, MemoryPriority::High)
            }
            FacetRecipe::OpenObjections => {
                (MemoryKind::Objection, Stage::Followup, MemoryPriority::Medium)
            }
            FacetRecipe::NextSteps => (MemoryKind::NextStep, Stage::Followup, MemoryPriority::High),
        }
    }

    /// Build the query for one account/lead pair
    pub fn query(&self, account_id: &str, lead_id: &str) -> Result<MemoryFacetQuery> {
        let (kind, stage, priority_min) = self.preset();
        let tags = MemoryTagFacets::new(MemoryEntity::Lead, kind, stage)
            .account(account_id)
            .lead(lead_id)
            .build()?;
        Ok(MemoryFacetQuery {
            tags,
            priority_min: Some(priority_min),
            limit: FACET_QUERY_LIMIT,
        })
    }
}

impl std::fmt::Display for FacetRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FacetRecipe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lead_preferences" | "preferences" => Ok(FacetRecipe::LeadPreferences),
            "open_objections" | "objections" => Ok(FacetRecipe::OpenObjections),
            "next_steps" => Ok(FacetRecipe::NextSteps),
            _ => Err(format!("Unknown facet recipe: {}", s)),
        }
    }
}

/// Stated preferences of a lead, gathered during outreach
pub fn facet_lead_preferences(account_id: &str, lead_id: &str) -> Result<MemoryFacetQuery> {
    FacetRecipe::LeadPreferences.query(account_id, lead_id)
}

/// Objections raised by a lead that still need handling
pub fn facet_open_objections(account_id: &str, lead_id: &str) -> Result<MemoryFacetQuery> {
    FacetRecipe::OpenObjections.query(account_id, lead_id)
}

/// Agreed next steps with a lead
pub fn facet_next_steps(account_id: &str, lead_id: &str) -> Result<MemoryFacetQuery> {
    FacetRecipe::NextSteps.query(account_id, lead_id)
}
