//! Core enumerations shared by records, tags, filters and plans
//!
//! Every literal union of the data contract is a closed enum here. Wire
//! spelling is fixed by `as_str` and the matching serde rename, and `FromStr`
//! accepts the same spelling case-insensitively.

use serde::{Deserialize, Serialize};

/// Workflow stage of the sales crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Research,
    Outreach,
    Followup,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Research, Stage::Outreach, Stage::Followup];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::Outreach => "outreach",
            Stage::Followup => "followup",
        }
    }

    /// Stages that can only be planned for a concrete account and lead
    pub fn requires_lead_scope(&self) -> bool {
        matches!(self, Stage::Outreach | Stage::Followup)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "research" => Ok(Stage::Research),
            "outreach" => Ok(Stage::Outreach),
            "followup" => Ok(Stage::Followup),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Outreach channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Email,
    Linkedin,
    Sms,
    Call,
    Other,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Linkedin => "linkedin",
            Channel::Sms => "sms",
            Channel::Call => "call",
            Channel::Other => "other",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "linkedin" => Ok(Channel::Linkedin),
            "sms" => Ok(Channel::Sms),
            "call" => Ok(Channel::Call),
            "other" => Ok(Channel::Other),
            _ => Err(format!("Unknown channel: {}", s)),
        }
    }
}

/// Discriminator of a vector metadata record (the `type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Playbook,
    CaseStudy,
    AccountNote,
    LeadNote,
    Outreach,
    Trace,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::Playbook,
        RecordType::CaseStudy,
        RecordType::AccountNote,
        RecordType::LeadNote,
        RecordType::Outreach,
        RecordType::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Playbook => "playbook",
            RecordType::CaseStudy => "case_study",
            RecordType::AccountNote => "account_note",
            RecordType::LeadNote => "lead_note",
            RecordType::Outreach => "outreach",
            RecordType::Trace => "trace",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "playbook" => Ok(RecordType::Playbook),
            "case_study" => Ok(RecordType::CaseStudy),
            "account_note" => Ok(RecordType::AccountNote),
            "lead_note" => Ok(RecordType::LeadNote),
            "outreach" => Ok(RecordType::Outreach),
            "trace" => Ok(RecordType::Trace),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}

/// Kind of run artifact stored in the traces namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceType {
    RunSummary,
    TaskSummary,
    ToolCall,
}

impl TraceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceType::RunSummary => "run_summary",
            TraceType::TaskSummary => "task_summary",
            TraceType::ToolCall => "tool_call",
        }
    }
}

impl std::fmt::Display for TraceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TraceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run_summary" => Ok(TraceType::RunSummary),
            "task_summary" => Ok(TraceType::TaskSummary),
            "tool_call" => Ok(TraceType::ToolCall),
            _ => Err(format!("Unknown trace type: {}", s)),
        }
    }
}

/// Delivery status of an outreach artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutreachStatus {
    #[default]
    Draft,
    Sent,
    ReplyReceived,
    NoReply,
}

impl OutreachStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutreachStatus::Draft => "draft",
            OutreachStatus::Sent => "sent",
            OutreachStatus::ReplyReceived => "reply_received",
            OutreachStatus::NoReply => "no_reply",
        }
    }
}

impl std::fmt::Display for OutreachStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutreachStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(OutreachStatus::Draft),
            "sent" => Ok(OutreachStatus::Sent),
            "reply_received" => Ok(OutreachStatus::ReplyReceived),
            "no_reply" => Ok(OutreachStatus::NoReply),
            _ => Err(format!("Unknown outreach status: {}", s)),
        }
    }
}

/// Origin of a reference document (playbooks, case studies)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSource {
    Internal,
    Url,
    File,
}

impl DocSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocSource::Internal => "internal",
            DocSource::Url => "url",
            DocSource::File => "file",
        }
    }
}

impl std::fmt::Display for DocSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "internal" => Ok(DocSource::Internal),
            "url" => Ok(DocSource::Url),
            "file" => Ok(DocSource::File),
            _ => Err(format!("Unknown document source: {}", s)),
        }
    }
}

/// Author of a note or memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    #[default]
    Agent,
    Human,
    Import,
}

impl NoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteSource::Agent => "agent",
            NoteSource::Human => "human",
            NoteSource::Import => "import",
        }
    }
}

impl std::fmt::Display for NoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agent" => Ok(NoteSource::Agent),
            "human" => Ok(NoteSource::Human),
            "import" => Ok(NoteSource::Import),
            _ => Err(format!("Unknown note source: {}", s)),
        }
    }
}

/// Entity a memory is about (the `entity:` tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryEntity {
    Account,
    Lead,
    Run,
}

impl MemoryEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryEntity::Account => "account",
            MemoryEntity::Lead => "lead",
            MemoryEntity::Run => "run",
        }
    }
}

impl std::fmt::Display for MemoryEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "account" => Ok(MemoryEntity::Account),
            "lead" => Ok(MemoryEntity::Lead),
            "run" => Ok(MemoryEntity::Run),
            _ => Err(format!("Unknown memory entity: {}", s)),
        }
    }
}

/// Kind of memory (the `type:` tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Preference,
    Objection,
    Decision,
    NextStep,
    Summary,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Preference => "preference",
            MemoryKind::Objection => "objection",
            MemoryKind::Decision => "decision",
            MemoryKind::NextStep => "next_step",
            MemoryKind::Summary => "summary",
        }
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preference" => Ok(MemoryKind::Preference),
            "objection" => Ok(MemoryKind::Objection),
            "decision" => Ok(MemoryKind::Decision),
            "next_step" => Ok(MemoryKind::NextStep),
            "summary" => Ok(MemoryKind::Summary),
            _ => Err(format!("Unknown memory kind: {}", s)),
        }
    }
}

/// Priority of a memory entry, ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemoryPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl MemoryPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryPriority::Low => "LOW",
            MemoryPriority::Medium => "MEDIUM",
            MemoryPriority::High => "HIGH",
            MemoryPriority::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for MemoryPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(MemoryPriority::Low),
            "MEDIUM" => Ok(MemoryPriority::Medium),
            "HIGH" => Ok(MemoryPriority::High),
            "CRITICAL" => Ok(MemoryPriority::Critical),
            _ => Err(format!("Unknown memory priority: {}", s)),
        }
    }
}
