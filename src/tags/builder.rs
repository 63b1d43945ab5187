//! Canonical memory tag construction
//!
//! Memory lookups match tags exactly, so the same facets must always produce
//! the same tag sequence. Order is fixed: `entity`, `type`, `stage`, then
//! `account`, `lead`, `channel`, `status`, `persona`, `vertical` when given,
//! then caller extras verbatim.

use serde::{Deserialize, Serialize};

use super::{encode, normalize};
use crate::error::Result;
use crate::types::{Channel, MemoryEntity, MemoryKind, Stage};

/// Semantic facets for a memory tag set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTagFacets {
    pub entity: MemoryEntity,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    /// Pre-formed `key:value` tags appended after the canonical facets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
}

impl MemoryTagFacets {
    pub fn new(entity: MemoryEntity, kind: MemoryKind, stage: Stage) -> Self {
        Self {
            entity,
            kind,
            stage,
            account_id: None,
            lead_id: None,
            channel: None,
            status: None,
            persona: None,
            vertical: None,
            extras: Vec::new(),
        }
    }

    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn lead(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn vertical(mut self, vertical: impl Into<String>) -> Self {
        self.vertical = Some(vertical.into());
        self
    }

    pub fn extra(mut self, tag: impl Into<String>) -> Self {
        self.extras.push(tag.into());
        self
    }

    /// Shorthand for [`build_memory_tags`]
    pub fn build(&self) -> Result<Vec<String>> {
        build_memory_tags(self)
    }
}

/// Build the canonical tag set for a memory record
pub fn build_memory_tags(facets: &MemoryTagFacets) -> Result<Vec<String>> {
    let mut tags = vec![
        encode("entity", facets.entity.as_str())?,
        encode("type", facets.kind.as_str())?,
        encode("stage", facets.stage.as_str())?,
    ];

    let optional = [
        ("account", facets.account_id.as_deref()),
        ("lead", facets.lead_id.as_deref()),
        ("channel", facets.channel.as_ref().map(Channel::as_str)),
        ("status", facets.status.as_deref()),
        ("persona", facets.persona.as_deref()),
        ("vertical", facets.vertical.as_deref()),
    ];
    for (key, value) in optional {
        // empty string means "not provided"
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            tags.push(encode(key, value)?);
        }
    }

    tags.extend(facets.extras.iter().cloned());
    normalize(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrewDbError;

    #[test]
    fn test_mandatory_facets_come_first() {
        let tags = MemoryTagFacets::new(MemoryEntity::Lead, MemoryKind::Objection, Stage::Followup)
            .build()
            .unwrap();
        assert_eq!(tags, vec!["entity:lead", "type:objection", "stage:followup"]);
    }

    #[test]
    fn test_fixed_optional_order() {
        // setters called out of order; output order must not change
        let tags = MemoryTagFacets::new(MemoryEntity::Lead, MemoryKind::Decision, Stage::Outreach)
            .vertical("fintech")
            .persona("cfo")
            .status("sent")
            .channel(Channel::Linkedin)
            .lead("L1")
            .account("A1")
            .build()
            .unwrap();
        assert_eq!(
            tags,
            vec![
                "entity:lead",
                "type:decision",
                "stage:outreach",
                "account:A1",
                "lead:L1",
                "channel:linkedin",
                "status:sent",
                "persona:cfo",
                "vertical:fintech",
            ]
        );
    }

    #[test]
    fn test_extras_appended_and_deduped() {
        let tags = MemoryTagFacets::new(MemoryEntity::Account, MemoryKind::Summary, Stage::Research)
            .account("A1")
            .extra("topic:pricing")
            .extra("account:A1")
            .extra("topic:pricing")
            .build()
            .unwrap();
        assert_eq!(
            tags,
            vec![
                "entity:account",
                "type:summary",
                "stage:research",
                "account:A1",
                "topic:pricing",
            ]
        );
    }

    #[test]
    fn test_empty_optional_is_skipped() {
        let tags = MemoryTagFacets::new(MemoryEntity::Run, MemoryKind::Summary, Stage::Research)
            .account("")
            .build()
            .unwrap();
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn test_blank_optional_is_rejected() {
        let result = MemoryTagFacets::new(MemoryEntity::Run, MemoryKind::Summary, Stage::Research)
            .persona("   ")
            .build();
        assert!(matches!(result, Err(CrewDbError::InvalidTag(_))));
    }

    #[test]
    fn test_malformed_extra_is_rejected() {
        let result = MemoryTagFacets::new(MemoryEntity::Lead, MemoryKind::Summary, Stage::Research)
            .extra("loose")
            .build();
        assert!(matches!(result, Err(CrewDbError::InvalidTag(_))));
    }
}
