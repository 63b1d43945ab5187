//! Memory records for the append-only memory facility
//!
//! A memory record maps 1:1 onto the facility's `create` call. Its tag set
//! must carry the `stage`, `type` and `entity` facets so that tag lookups
//! can always find it again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::is_present;
use crate::error::{CrewDbError, Result};
use crate::tags::{normalize, tag_keys};
use crate::types::{MemoryPriority, NoteSource};

/// Tag keys every memory record must carry
pub const REQUIRED_MEMORY_TAG_KEYS: [&str; 3] = ["stage", "type", "entity"];

const RECORD: &str = "memory";

/// Scope identifiers stored alongside a memory, used for post-filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub source: NoteSource,
    #[serde(default = "Utc::now")]
    pub ts: DateTime<Utc>,
}

impl Default for MemoryMeta {
    fn default() -> Self {
        Self {
            crew_id: None,
            agent_id: None,
            run_id: None,
            task_id: None,
            account_id: None,
            lead_id: None,
            source: NoteSource::default(),
            ts: Utc::now(),
        }
    }
}

impl MemoryMeta {
    pub fn for_lead(account_id: impl Into<String>, lead_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            lead_id: Some(lead_id.into()),
            ..Default::default()
        }
    }
}

/// Unvalidated memory fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryDraft {
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: MemoryPriority,
    #[serde(default)]
    pub metadata: MemoryMeta,
}

impl MemoryDraft {
    pub fn new(content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            content: content.into(),
            tags,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn priority(mut self, priority: MemoryPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn metadata(mut self, metadata: MemoryMeta) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validate into a [`MemoryRecord`]
    pub fn build(self) -> Result<MemoryRecord> {
        MemoryRecord::try_from(self)
    }
}

/// A validated memory write request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MemoryDraft")]
pub struct MemoryRecord {
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    tags: Vec<String>,
    priority: MemoryPriority,
    metadata: MemoryMeta,
}

impl MemoryRecord {
    /// Validate a record with default priority and metadata
    pub fn new(content: impl Into<String>, tags: Vec<String>) -> Result<Self> {
        MemoryDraft::new(content, tags).build()
    }

    /// Strict ingest of an untyped memory object
    pub fn from_json(value: Value) -> Result<Self> {
        let draft: MemoryDraft = serde_json::from_value(value)
            .map_err(|e| CrewDbError::validation(RECORD, e.to_string()))?;
        draft.build()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn priority(&self) -> MemoryPriority {
        self.priority
    }

    pub fn metadata(&self) -> &MemoryMeta {
        &self.metadata
    }
}

fn validate(draft: MemoryDraft) -> Result<MemoryRecord> {
    if !is_present(Some(draft.content.as_str())) {
        return Err(CrewDbError::validation(RECORD, "content is required"));
    }
    let tags = normalize(&draft.tags)?;

    let keys = tag_keys(&tags);
    for required in REQUIRED_MEMORY_TAG_KEYS {
        if !keys.contains(required) {
            return Err(CrewDbError::validation(
                RECORD,
                format!("tags must include '{}:*'", required),
            ));
        }
    }

    Ok(MemoryRecord {
        content: draft.content,
        title: draft.title,
        tags,
        priority: draft.priority,
        metadata: draft.metadata,
    })
}

impl TryFrom<MemoryDraft> for MemoryRecord {
    type Error = CrewDbError;

    fn try_from(draft: MemoryDraft) -> Result<Self> {
        let result = validate(draft);
        if let Err(e) = &result {
            debug!(error = %e, "memory record rejected");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::MemoryTagFacets;
    use crate::types::{MemoryEntity, MemoryKind, Stage};
    use serde_json::json;

    fn canonical_tags() -> Vec<String> {
        MemoryTagFacets::new(MemoryEntity::Lead, MemoryKind::Preference, Stage::Outreach)
            .account("A1")
            .lead("L1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_record_defaults() {
        let record = MemoryRecord::new("Prefers async updates", canonical_tags()).unwrap();
        assert_eq!(record.priority(), MemoryPriority::Medium);
        assert_eq!(record.metadata().source, NoteSource::Agent);
        assert_eq!(record.title(), None);
        assert_eq!(record.tags().len(), 5);
    }

    #[test]
    fn test_missing_required_facet_fails() {
        for missing in REQUIRED_MEMORY_TAG_KEYS {
            let tags: Vec<String> = canonical_tags()
                .into_iter()
                .filter(|t| !t.starts_with(&format!("{}:", missing)))
                .collect();
            let err = MemoryRecord::new("x", tags).unwrap_err();
            assert_eq!(
                err.rule(),
                Some(format!("tags must include '{}:*'", missing).as_str())
            );
        }
    }

    #[test]
    fn test_blank_content_fails() {
        let err = MemoryRecord::new("   ", canonical_tags()).unwrap_err();
        assert_eq!(err.rule(), Some("content is required"));
    }

    #[test]
    fn test_malformed_tag_fails() {
        let mut tags = canonical_tags();
        tags.push("loose".into());
        assert!(matches!(
            MemoryRecord::new("x", tags),
            Err(CrewDbError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_builder_fields() {
        let record = MemoryDraft::new("Budget approved for Q3", canonical_tags())
            .title("budget")
            .priority(MemoryPriority::Critical)
            .metadata(MemoryMeta::for_lead("A1", "L1"))
            .build()
            .unwrap();
        assert_eq!(record.title(), Some("budget"));
        assert_eq!(record.priority(), MemoryPriority::Critical);
        assert_eq!(record.metadata().lead_id.as_deref(), Some("L1"));
    }

    #[test]
    fn test_from_json_strict() {
        let ok = MemoryRecord::from_json(json!({
            "content": "Asked for a pilot",
            "tags": ["entity:lead", "type:next_step", "stage:followup"],
            "priority": "HIGH",
            "metadata": { "account_id": "A1", "run_id": "R1" }
        }))
        .unwrap();
        assert_eq!(ok.priority(), MemoryPriority::High);

        let unknown = MemoryRecord::from_json(json!({
            "content": "x",
            "tags": ["entity:lead", "type:next_step", "stage:followup"],
            "importance": 0.9
        }));
        assert!(matches!(unknown, Err(CrewDbError::Validation { record: "memory", .. })));

        let bad_priority = MemoryRecord::from_json(json!({
            "content": "x",
            "tags": ["entity:lead", "type:next_step", "stage:followup"],
            "priority": "URGENT"
        }));
        assert!(bad_priority.is_err());
    }

    #[test]
    fn test_serde_deserialize_validates() {
        let result: std::result::Result<MemoryRecord, _> =
            serde_json::from_value(json!({ "content": "x", "tags": ["stage:research"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let record = MemoryRecord::new("x", canonical_tags()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["priority"], "MEDIUM");
        assert_eq!(json["metadata"]["source"], "agent");
        assert!(json.get("title").is_none());
    }
}
