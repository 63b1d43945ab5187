//! Vector metadata records, one shape per namespace
//!
//! ## Invariants
//!
//! - `account_note` requires `account_id`
//! - `lead_note` and `outreach` require `account_id` and `lead_id`
//! - `trace` requires `run_id` and `crew_id`, plus `tool_call_id` when
//!   `trace_type` is `tool_call`
//! - `playbook` and `case_study` require `doc_id` and `title`
//! - JSON ingest rejects keys the record type does not define

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::require;
use super::scope::{CrewScope, SalesScope};
use crate::error::{CrewDbError, Result};
use crate::namespace::Namespace;
use crate::tags::normalize;
use crate::types::{Channel, DocSource, NoteSource, OutreachStatus, RecordType, Stage, TraceType};

fn default_true() -> bool {
    true
}

/// Generate an outreach artifact id (`out_` + 32 hex chars)
pub fn new_artifact_id() -> String {
    format!("out_{}", Uuid::new_v4().simple())
}

/// Namespace `sales_playbooks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookMeta {
    pub doc_id: String,
    pub title: String,
    pub source: DocSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub chunk_index: u32,
    /// Scalar copies of facets for strict filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
}

impl PlaybookMeta {
    pub fn new(doc_id: impl Into<String>, title: impl Into<String>, source: DocSource) -> Self {
        Self {
            doc_id: doc_id.into(),
            title: title.into(),
            source,
            url: None,
            section: None,
            chunk_index: 0,
            persona: None,
            vertical: None,
        }
    }
}

/// Namespace `sales_cases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyMeta {
    pub doc_id: String,
    pub title: String,
    pub source: DocSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
}

impl CaseStudyMeta {
    pub fn new(doc_id: impl Into<String>, title: impl Into<String>, source: DocSource) -> Self {
        Self {
            doc_id: doc_id.into(),
            title: title.into(),
            source,
            url: None,
            section: None,
            chunk_index: 0,
            account_id: None,
            industry: None,
            vertical: None,
            persona: None,
            metrics: None,
        }
    }
}

/// Namespace `accounts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNoteMeta {
    #[serde(flatten)]
    pub scope: SalesScope,
    #[serde(flatten)]
    pub crew: CrewScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub source: NoteSource,
    #[serde(default)]
    pub stage: Stage,
}

impl AccountNoteMeta {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            scope: SalesScope::account(account_id),
            ..Default::default()
        }
    }
}

/// Namespace `leads`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNoteMeta {
    #[serde(flatten)]
    pub scope: SalesScope,
    #[serde(flatten)]
    pub crew: CrewScope,
    #[serde(default)]
    pub source: NoteSource,
    #[serde(default)]
    pub stage: Stage,
}

impl LeadNoteMeta {
    pub fn new(account_id: impl Into<String>, lead_id: impl Into<String>) -> Self {
        Self {
            scope: SalesScope::lead(account_id, lead_id),
            ..Default::default()
        }
    }
}

/// Namespace `outreach_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachMeta {
    #[serde(flatten)]
    pub scope: SalesScope,
    #[serde(flatten)]
    pub crew: CrewScope,
    #[serde(default = "new_artifact_id")]
    pub artifact_id: String,
    #[serde(default)]
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub status: OutreachStatus,
}

impl Default for OutreachMeta {
    fn default() -> Self {
        Self {
            scope: SalesScope::default(),
            crew: CrewScope::default(),
            artifact_id: new_artifact_id(),
            channel: Channel::default(),
            variant: None,
            status: OutreachStatus::default(),
        }
    }
}

impl OutreachMeta {
    pub fn new(account_id: impl Into<String>, lead_id: impl Into<String>) -> Self {
        Self {
            scope: SalesScope::lead(account_id, lead_id),
            ..Default::default()
        }
    }
}

/// Namespace `crew_runs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMeta {
    #[serde(flatten)]
    pub scope: SalesScope,
    #[serde(flatten)]
    pub crew: CrewScope,
    pub trace_type: TraceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub stage: Stage,
    #[serde(default = "default_true")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl TraceMeta {
    pub fn new(
        crew_id: impl Into<String>,
        run_id: impl Into<String>,
        trace_type: TraceType,
        stage: Stage,
    ) -> Self {
        Self {
            scope: SalesScope::default(),
            crew: CrewScope::run(crew_id, run_id),
            trace_type,
            tool_call_id: None,
            stage,
            ok: true,
            duration_ms: None,
            tool_name: None,
        }
    }
}

/// Variant-specific fields, keyed by the `type` discriminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VectorBody {
    Playbook(PlaybookMeta),
    CaseStudy(CaseStudyMeta),
    AccountNote(AccountNoteMeta),
    LeadNote(LeadNoteMeta),
    Outreach(OutreachMeta),
    Trace(TraceMeta),
}

impl VectorBody {
    pub fn record_type(&self) -> RecordType {
        match self {
            VectorBody::Playbook(_) => RecordType::Playbook,
            VectorBody::CaseStudy(_) => RecordType::CaseStudy,
            VectorBody::AccountNote(_) => RecordType::AccountNote,
            VectorBody::LeadNote(_) => RecordType::LeadNote,
            VectorBody::Outreach(_) => RecordType::Outreach,
            VectorBody::Trace(_) => RecordType::Trace,
        }
    }

    /// Cross-field rules, run after every field is individually valid
    fn check_invariants(&self) -> Result<()> {
        let record = self.record_type().as_str();
        match self {
            VectorBody::Playbook(m) => {
                require(record, "doc_id", Some(m.doc_id.as_str()))?;
                require(record, "title", Some(m.title.as_str()))
            }
            VectorBody::CaseStudy(m) => {
                require(record, "doc_id", Some(m.doc_id.as_str()))?;
                require(record, "title", Some(m.title.as_str()))
            }
            VectorBody::AccountNote(m) => require(record, "account_id", m.scope.account_id.as_deref()),
            VectorBody::LeadNote(m) => {
                require(record, "lead_id", m.scope.lead_id.as_deref())?;
                require(record, "account_id", m.scope.account_id.as_deref())
            }
            VectorBody::Outreach(m) => {
                require(record, "account_id", m.scope.account_id.as_deref())?;
                require(record, "lead_id", m.scope.lead_id.as_deref())?;
                require(record, "artifact_id", Some(m.artifact_id.as_str()))
            }
            VectorBody::Trace(m) => {
                require(record, "run_id", m.crew.run_id.as_deref())?;
                require(record, "crew_id", m.crew.crew_id.as_deref())?;
                if m.trace_type == TraceType::ToolCall {
                    require(record, "tool_call_id", m.tool_call_id.as_deref()).map_err(|_| {
                        CrewDbError::validation(
                            record,
                            "tool_call_id is required when trace_type == 'tool_call'",
                        )
                    })?;
                }
                Ok(())
            }
        }
    }
}

impl From<PlaybookMeta> for VectorBody {
    fn from(meta: PlaybookMeta) -> Self {
        VectorBody::Playbook(meta)
    }
}

impl From<CaseStudyMeta> for VectorBody {
    fn from(meta: CaseStudyMeta) -> Self {
        VectorBody::CaseStudy(meta)
    }
}

impl From<AccountNoteMeta> for VectorBody {
    fn from(meta: AccountNoteMeta) -> Self {
        VectorBody::AccountNote(meta)
    }
}

impl From<LeadNoteMeta> for VectorBody {
    fn from(meta: LeadNoteMeta) -> Self {
        VectorBody::LeadNote(meta)
    }
}

impl From<OutreachMeta> for VectorBody {
    fn from(meta: OutreachMeta) -> Self {
        VectorBody::Outreach(meta)
    }
}

impl From<TraceMeta> for VectorBody {
    fn from(meta: TraceMeta) -> Self {
        VectorBody::Trace(meta)
    }
}

/// Keys each record type accepts on JSON ingest
fn is_known_field(record_type: RecordType, key: &str) -> bool {
    if matches!(key, "type" | "ts" | "tags") {
        return true;
    }
    let scoped = matches!(
        key,
        "account_id" | "lead_id" | "crew_id" | "agent_id" | "run_id" | "task_id"
    );
    match record_type {
        RecordType::Playbook => matches!(
            key,
            "doc_id" | "title" | "source" | "url" | "section" | "chunk_index" | "persona" | "vertical"
        ),
        RecordType::CaseStudy => matches!(
            key,
            "doc_id"
                | "title"
                | "source"
                | "url"
                | "section"
                | "chunk_index"
                | "account_id"
                | "industry"
                | "vertical"
                | "persona"
                | "metrics"
        ),
        RecordType::AccountNote => scoped || matches!(key, "title" | "source" | "stage"),
        RecordType::LeadNote => scoped || matches!(key, "source" | "stage"),
        RecordType::Outreach => {
            scoped || matches!(key, "artifact_id" | "channel" | "variant" | "status")
        }
        RecordType::Trace => {
            scoped
                || matches!(
                    key,
                    "trace_type" | "tool_call_id" | "stage" | "ok" | "duration_ms" | "tool_name"
                )
        }
    }
}

/// A validated metadata entry for a vector write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct VectorMetadata {
    #[serde(flatten)]
    body: VectorBody,
    #[serde(rename = "ts")]
    timestamp: DateTime<Utc>,
    tags: Vec<String>,
}

impl VectorMetadata {
    /// Validate a record stamped with the current time
    pub fn new(body: impl Into<VectorBody>, tags: Vec<String>) -> Result<Self> {
        Self::at(body, tags, Utc::now())
    }

    /// Validate a record with an explicit timestamp
    pub fn at(
        body: impl Into<VectorBody>,
        tags: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let body = body.into();
        let record_type = body.record_type();
        let result = normalize(tags).and_then(|tags| {
            body.check_invariants()?;
            Ok(Self {
                body,
                timestamp,
                tags,
            })
        });
        if let Err(e) = &result {
            debug!(record = %record_type, error = %e, "vector metadata rejected");
        }
        result
    }

    /// Strict ingest of an untyped metadata object
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(CrewDbError::validation(
                "vector_metadata",
                "metadata must be a JSON object",
            ));
        };

        let record_type: RecordType = match map.get("type") {
            Some(Value::String(s)) => s
                .parse()
                .map_err(|e: String| CrewDbError::validation("vector_metadata", e))?,
            Some(_) => {
                return Err(CrewDbError::validation(
                    "vector_metadata",
                    "type must be a string",
                ))
            }
            None => return Err(CrewDbError::validation("vector_metadata", "type is required")),
        };
        let record = record_type.as_str();

        if let Some(key) = map.keys().find(|k| !is_known_field(record_type, k.as_str())) {
            return Err(CrewDbError::validation(
                record,
                format!("unknown field '{}'", key),
            ));
        }

        let timestamp = match map.remove("ts") {
            None | Some(Value::Null) => Utc::now(),
            Some(v) => serde_json::from_value(v)
                .map_err(|e| CrewDbError::validation(record, format!("ts: {}", e)))?,
        };
        let tags: Vec<String> = match map.remove("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => serde_json::from_value(v)
                .map_err(|e| CrewDbError::validation(record, format!("tags: {}", e)))?,
        };
        let body: VectorBody = serde_json::from_value(Value::Object(map))
            .map_err(|e| CrewDbError::validation(record, e.to_string()))?;

        Self::at(body, tags, timestamp)
    }

    /// Flat metadata object for the store's vector write
    pub fn to_metadata(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(CrewDbError::validation(
                self.record_type().as_str(),
                "metadata did not serialize to an object",
            )),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.body.record_type()
    }

    /// Namespace this record must be written to
    pub fn namespace(&self) -> Namespace {
        Namespace::for_record_type(self.record_type())
    }

    pub fn body(&self) -> &VectorBody {
        &self.body
    }

    pub fn into_body(self) -> VectorBody {
        self.body
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl TryFrom<Value> for VectorMetadata {
    type Error = CrewDbError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}
