//! Deterministic vector search filters
//!
//! Filters are flat mappings of scalar values. The store treats an absent key
//! as unconstrained and a null as a constraint, so unset facets are dropped
//! and never serialized as null. Every filter pins `type` to the record type
//! of its namespace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Channel, OutreachStatus, RecordType, Stage, TraceType};

/// Flat filter mapping passed to the store's vector search
pub type FilterMap = Map<String, Value>;

/// All filterable facets; unset fields are omitted from the mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    // Sales scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,

    // Crew scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OutreachStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_type: Option<TraceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl VectorFilter {
    pub fn for_type(record_type: RecordType) -> Self {
        Self {
            record_type: Some(record_type),
            ..Default::default()
        }
    }

    /// Flatten into the store's filter mapping, dropping unset facets
    pub fn into_map(self) -> FilterMap {
        let pairs = [
            ("type", self.record_type.map(|t| t.as_str().to_string())),
            ("stage", self.stage.map(|s| s.as_str().to_string())),
            ("account_id", self.account_id),
            ("lead_id", self.lead_id),
            ("crew_id", self.crew_id),
            ("run_id", self.run_id),
            ("task_id", self.task_id),
            ("channel", self.channel.map(|c| c.as_str().to_string())),
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("trace_type", self.trace_type.map(|t| t.as_str().to_string())),
            ("tool_call_id", self.tool_call_id),
            ("persona", self.persona),
            ("vertical", self.vertical),
            ("tool_name", self.tool_name),
        ];
        pairs
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), Value::String(v))))
            .collect()
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Namespace `sales_playbooks`
pub fn filter_playbooks(persona: Option<&str>, vertical: Option<&str>) -> FilterMap {
    VectorFilter {
        persona: owned(persona),
        vertical: owned(vertical),
        ..VectorFilter::for_type(RecordType::Playbook)
    }
    .into_map()
}

/// Namespace `sales_cases`
pub fn filter_case_studies(vertical: Option<&str>, persona: Option<&str>) -> FilterMap {
    VectorFilter {
        vertical: owned(vertical),
        persona: owned(persona),
        ..VectorFilter::for_type(RecordType::CaseStudy)
    }
    .into_map()
}

/// Namespace `accounts`
pub fn filter_account_notes(account_id: &str, stage: Option<Stage>) -> FilterMap {
    VectorFilter {
        account_id: Some(account_id.to_string()),
        stage,
        ..VectorFilter::for_type(RecordType::AccountNote)
    }
    .into_map()
}

/// Namespace `leads`
pub fn filter_lead_notes(account_id: &str, lead_id: &str, stage: Option<Stage>) -> FilterMap {
    VectorFilter {
        account_id: Some(account_id.to_string()),
        lead_id: Some(lead_id.to_string()),
        stage,
        ..VectorFilter::for_type(RecordType::LeadNote)
    }
    .into_map()
}

/// Namespace `outreach_history`
pub fn filter_outreach_history(
    account_id: &str,
    lead_id: &str,
    channel: Option<Channel>,
    status: Option<OutreachStatus>,
) -> FilterMap {
    VectorFilter {
        account_id: Some(account_id.to_string()),
        lead_id: Some(lead_id.to_string()),
        channel,
        status,
        ..VectorFilter::for_type(RecordType::Outreach)
    }
    .into_map()
}

/// Optional facets for a run trace query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceFilter {
    pub run_id: Option<String>,
    pub account_id: Option<String>,
    pub lead_id: Option<String>,
    pub trace_type: Option<TraceType>,
    pub task_id: Option<String>,
    pub tool_call_id: Option<String>,
    pub tool_name: Option<String>,
}

/// Namespace `crew_runs`
pub fn filter_run_traces(trace: TraceFilter) -> FilterMap {
    VectorFilter {
        run_id: trace.run_id,
        account_id: trace.account_id,
        lead_id: trace.lead_id,
        trace_type: trace.trace_type,
        task_id: trace.task_id,
        tool_call_id: trace.tool_call_id,
        tool_name: trace.tool_name,
        ..VectorFilter::for_type(RecordType::Trace)
    }
    .into_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn as_value(map: FilterMap) -> Value {
        Value::Object(map)
    }

    #[test]
    fn test_playbooks_only_type_when_unfaceted() {
        assert_eq!(as_value(filter_playbooks(None, None)), json!({ "type": "playbook" }));
    }

    #[test]
    fn test_playbooks_with_facets() {
        assert_eq!(
            as_value(filter_playbooks(Some("cfo"), Some("fintech"))),
            json!({ "type": "playbook", "persona": "cfo", "vertical": "fintech" })
        );
    }

    #[test]
    fn test_case_studies() {
        assert_eq!(
            as_value(filter_case_studies(Some("retail"), None)),
            json!({ "type": "case_study", "vertical": "retail" })
        );
    }

    #[test]
    fn test_account_and_lead_notes() {
        assert_eq!(
            as_value(filter_account_notes("A1", None)),
            json!({ "type": "account_note", "account_id": "A1" })
        );
        assert_eq!(
            as_value(filter_lead_notes("A1", "L1", Some(Stage::Outreach))),
            json!({
                "type": "lead_note",
                "account_id": "A1",
                "lead_id": "L1",
                "stage": "outreach"
            })
        );
    }

    #[test]
    fn test_outreach_history() {
        assert_eq!(
            as_value(filter_outreach_history(
                "A1",
                "L1",
                Some(Channel::Email),
                Some(OutreachStatus::NoReply)
            )),
            json!({
                "type": "outreach",
                "account_id": "A1",
                "lead_id": "L1",
                "channel": "email",
                "status": "no_reply"
            })
        );
    }

    #[test]
    fn test_run_traces_open_facets() {
        let filter = filter_run_traces(TraceFilter {
            run_id: Some("R1".into()),
            trace_type: Some(TraceType::ToolCall),
            tool_name: Some("crm_lookup".into()),
            ..Default::default()
        });
        assert_eq!(
            as_value(filter),
            json!({
                "type": "trace",
                "run_id": "R1",
                "trace_type": "tool_call",
                "tool_name": "crm_lookup"
            })
        );
        assert_eq!(
            as_value(filter_run_traces(TraceFilter::default())),
            json!({ "type": "trace" })
        );
    }

    #[test]
    fn test_no_nulls_ever() {
        let map = VectorFilter::default().into_map();
        assert!(map.is_empty());
        let map = filter_lead_notes("A1", "L1", None);
        assert!(map.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_serialize_matches_into_map() {
        let filter = VectorFilter {
            account_id: Some("A1".into()),
            channel: Some(Channel::Sms),
            ..VectorFilter::for_type(RecordType::Outreach)
        };
        let via_serde = serde_json::to_value(&filter).unwrap();
        assert_eq!(via_serde, as_value(filter.into_map()));
    }
}
