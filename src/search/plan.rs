//! Stage-aware search plans
//!
//! A plan is the exact, ordered list of namespace queries a workflow stage
//! should run. Order is part of the contract: the most specific context
//! comes first and general reference material last, so consumers may cut a
//! plan short after a global result budget.
//!
//! | stage    | items (in order)                                          |
//! |----------|-----------------------------------------------------------|
//! | research | playbooks, case studies, account notes (if account given) |
//! | outreach | outreach history, lead notes, playbooks, case studies     |
//! | followup | outreach history, lead notes, playbooks, run artifacts    |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::{
    filter_account_notes, filter_case_studies, filter_lead_notes, filter_outreach_history,
    filter_playbooks, filter_run_traces, FilterMap, TraceFilter,
};
use crate::error::{CrewDbError, Result};
use crate::namespace::Namespace;
use crate::types::Stage;

/// Default result budget per namespace
pub const DEFAULT_TOP_K: usize = 6;

/// Case studies are supplementary at outreach and never get fewer than this
const MIN_CASE_STUDY_TOP_K: usize = 2;

/// Run artifacts at followup never get fewer than this
const MIN_RUN_ARTIFACT_TOP_K: usize = 4;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Inputs for [`build_stage_search_plan`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanRequest {
    pub stage: Stage,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub vertical: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default = "default_top_k")]
    pub per_namespace_top_k: usize,
}

impl PlanRequest {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            account_id: None,
            lead_id: None,
            vertical: None,
            persona: None,
            run_id: None,
            per_namespace_top_k: DEFAULT_TOP_K,
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

    pub fn vertical(mut self, vertical: impl Into<String>) -> Self {
        self.vertical = Some(vertical.into());
        self
    }

    pub fn persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn top_k(mut self, per_namespace_top_k: usize) -> Self {
        self.per_namespace_top_k = per_namespace_top_k;
        self
    }

    /// Shorthand for [`build_stage_search_plan`]
    pub fn plan(&self) -> Result<StageSearchPlan> {
        build_stage_search_plan(self)
    }
}

/// One namespace query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPlanItem {
    pub namespace: Namespace,
    pub filter: FilterMap,
    pub top_k: usize,
}

impl SearchPlanItem {
    fn new(namespace: Namespace, filter: FilterMap, top_k: usize) -> Self {
        Self {
            namespace,
            filter,
            top_k,
        }
    }
}

/// Ordered namespace queries for one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSearchPlan {
    stage: Stage,
    items: Vec<SearchPlanItem>,
}

impl StageSearchPlan {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn items(&self) -> &[SearchPlanItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SearchPlanItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Namespaces in query order
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.items.iter().map(|item| item.namespace).collect()
    }

    /// Upper bound on results across the whole plan
    pub fn total_top_k(&self) -> usize {
        self.items.iter().map(|item| item.top_k).sum()
    }
}

/// Empty or whitespace-only strings count as "not provided"
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn lead_scope<'a>(
    stage: Stage,
    account_id: Option<&'a str>,
    lead_id: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    match (account_id, lead_id) {
        (Some(account_id), Some(lead_id)) => Ok((account_id, lead_id)),
        _ => Err(CrewDbError::missing_scope(format!(
            "{} stage requires account_id and lead_id",
            stage
        ))),
    }
}

/// Build the ordered search plan for a workflow stage
pub fn build_stage_search_plan(request: &PlanRequest) -> Result<StageSearchPlan> {
    let top_k = request.per_namespace_top_k;
    if top_k == 0 {
        return Err(CrewDbError::validation(
            "search_plan",
            "per_namespace_top_k must be at least 1",
        ));
    }

    let account_id = given(&request.account_id);
    let lead_id = given(&request.lead_id);
    let vertical = given(&request.vertical);
    let persona = given(&request.persona);
    let run_id = given(&request.run_id);

    let items = match request.stage {
        Stage::Research => {
            let mut items = vec![
                SearchPlanItem::new(
                    Namespace::Playbooks,
                    filter_playbooks(persona, vertical),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::CaseStudies,
                    filter_case_studies(vertical, persona),
                    top_k,
                ),
            ];
            if let Some(account_id) = account_id {
                items.push(SearchPlanItem::new(
                    Namespace::Accounts,
                    filter_account_notes(account_id, None),
                    top_k,
                ));
            }
            items
        }
        Stage::Outreach => {
            let (account_id, lead_id) = lead_scope(request.stage, account_id, lead_id)?;
            vec![
                SearchPlanItem::new(
                    Namespace::OutreachHistory,
                    filter_outreach_history(account_id, lead_id, None, None),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::Leads,
                    filter_lead_notes(account_id, lead_id, None),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::Playbooks,
                    filter_playbooks(persona, vertical),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::CaseStudies,
                    filter_case_studies(vertical, persona),
                    (top_k / 2).max(MIN_CASE_STUDY_TOP_K),
                ),
            ]
        }
        Stage::Followup => {
            let (account_id, lead_id) = lead_scope(request.stage, account_id, lead_id)?;
            // same run: scope by run only; otherwise by account and lead
            let traces = match run_id {
                Some(run_id) => TraceFilter {
                    run_id: Some(run_id.to_string()),
                    ..Default::default()
                },
                None => TraceFilter {
                    account_id: Some(account_id.to_string()),
                    lead_id: Some(lead_id.to_string()),
                    ..Default::default()
                },
            };
            vec![
                SearchPlanItem::new(
                    Namespace::OutreachHistory,
                    filter_outreach_history(account_id, lead_id, None, None),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::Leads,
                    filter_lead_notes(account_id, lead_id, None),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::Playbooks,
                    filter_playbooks(persona, vertical),
                    top_k,
                ),
                SearchPlanItem::new(
                    Namespace::RunArtifacts,
                    filter_run_traces(traces),
                    top_k.max(MIN_RUN_ARTIFACT_TOP_K),
                ),
            ]
        }
    };

    debug!(
        stage = %request.stage,
        items = items.len(),
        per_namespace_top_k = top_k,
        "stage search plan built"
    );

    Ok(StageSearchPlan {
        stage: request.stage,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn top_ks(plan: &StageSearchPlan) -> Vec<usize> {
        plan.items().iter().map(|i| i.top_k).collect()
    }

    #[test]
    fn test_research_without_account() {
        let plan = PlanRequest::new(Stage::Research).plan().unwrap();
        assert_eq!(
            plan.namespaces(),
            vec![Namespace::Playbooks, Namespace::CaseStudies]
        );
        assert_eq!(top_ks(&plan), vec![6, 6]);
    }

    #[test]
    fn test_research_with_account() {
        let plan = PlanRequest::new(Stage::Research)
            .account("A1")
            .persona("cfo")
            .plan()
            .unwrap();
        assert_eq!(plan.len(), 3);
        let third = &plan.items()[2];
        assert_eq!(third.namespace, Namespace::Accounts);
        assert_eq!(
            Value::Object(third.filter.clone()),
            json!({ "type": "account_note", "account_id": "A1" })
        );
        assert_eq!(plan.items()[0].filter["persona"], "cfo");
    }

    #[test]
    fn test_research_ignores_lead_and_run() {
        let plan = PlanRequest::new(Stage::Research)
            .lead("L1")
            .run("R1")
            .plan()
            .unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_outreach_order_and_budgets() {
        let plan = PlanRequest::new(Stage::Outreach)
            .account("A1")
            .lead("L1")
            .top_k(6)
            .plan()
            .unwrap();
        assert_eq!(
            plan.namespaces(),
            vec![
                Namespace::OutreachHistory,
                Namespace::Leads,
                Namespace::Playbooks,
                Namespace::CaseStudies,
            ]
        );
        assert_eq!(top_ks(&plan), vec![6, 6, 6, 3]);
        assert_eq!(plan.total_top_k(), 21);
    }

    #[test]
    fn test_case_study_budget_floor() {
        let plan = PlanRequest::new(Stage::Outreach)
            .account("A1")
            .lead("L1")
            .top_k(3)
            .plan()
            .unwrap();
        assert_eq!(top_ks(&plan), vec![3, 3, 3, 2]);
    }

    #[test]
    fn test_outreach_requires_scope() {
        let err = PlanRequest::new(Stage::Outreach)
            .account("A1")
            .plan()
            .unwrap_err();
        assert!(matches!(err, CrewDbError::MissingScope(_)));
        assert_eq!(
            err.to_string(),
            "Missing scope: outreach stage requires account_id and lead_id"
        );
    }

    #[test]
    fn test_followup_requires_scope() {
        let err = PlanRequest::new(Stage::Followup).plan().unwrap_err();
        assert!(matches!(err, CrewDbError::MissingScope(_)));

        let err = PlanRequest::new(Stage::Followup)
            .account("")
            .lead("L1")
            .plan()
            .unwrap_err();
        assert!(matches!(err, CrewDbError::MissingScope(_)));
    }

    #[test]
    fn test_blank_ids_count_as_missing() {
        for stage in [Stage::Outreach, Stage::Followup] {
            let err = PlanRequest::new(stage)
                .account("   ")
                .lead("L1")
                .plan()
                .unwrap_err();
            assert!(matches!(err, CrewDbError::MissingScope(_)));

            let err = PlanRequest::new(stage)
                .account("A1")
                .lead("\t")
                .plan()
                .unwrap_err();
            assert!(matches!(err, CrewDbError::MissingScope(_)));
        }

        let plan = PlanRequest::new(Stage::Research)
            .account("  ")
            .plan()
            .unwrap();
        assert_eq!(plan.len(), 2);

        // blank run falls back to account and lead scoping
        let plan = PlanRequest::new(Stage::Followup)
            .account("A1")
            .lead("L1")
            .run(" ")
            .plan()
            .unwrap();
        let traces = &plan.items()[3];
        assert!(!traces.filter.contains_key("run_id"));
        assert_eq!(traces.filter["account_id"], "A1");
        assert_eq!(traces.filter["lead_id"], "L1");
    }

    #[test]
    fn test_followup_with_run_scopes_traces_by_run_only() {
        let plan = PlanRequest::new(Stage::Followup)
            .run("R1")
            .account("A1")
            .lead("L1")
            .plan()
            .unwrap();
        let traces = &plan.items()[3];
        assert_eq!(traces.namespace, Namespace::RunArtifacts);
        assert_eq!(traces.filter["run_id"], "R1");
        assert!(!traces.filter.contains_key("account_id"));
        assert!(!traces.filter.contains_key("lead_id"));
    }

    #[test]
    fn test_followup_without_run_scopes_traces_by_lead() {
        let plan = PlanRequest::new(Stage::Followup)
            .account("A1")
            .lead("L1")
            .plan()
            .unwrap();
        let traces = &plan.items()[3];
        assert_eq!(
            Value::Object(traces.filter.clone()),
            json!({ "type": "trace", "account_id": "A1", "lead_id": "L1" })
        );
    }

    #[test]
    fn test_followup_budgets() {
        let plan = PlanRequest::new(Stage::Followup)
            .account("A1")
            .lead("L1")
            .top_k(2)
            .plan()
            .unwrap();
        assert_eq!(top_ks(&plan), vec![2, 2, 2, 4]);

        let plan = PlanRequest::new(Stage::Followup)
            .account("A1")
            .lead("L1")
            .top_k(10)
            .plan()
            .unwrap();
        assert_eq!(top_ks(&plan), vec![10, 10, 10, 10]);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let err = PlanRequest::new(Stage::Research).top_k(0).plan().unwrap_err();
        assert_eq!(err.rule(), Some("per_namespace_top_k must be at least 1"));
    }

    #[test]
    fn test_plan_serializes_store_identifiers() {
        let plan = PlanRequest::new(Stage::Research).plan().unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["stage"], "research");
        assert_eq!(json["items"][0]["namespace"], "sales_playbooks");
        assert_eq!(json["items"][1]["namespace"], "sales_cases");
    }

    #[test]
    fn test_request_from_json_defaults_top_k() {
        let request: PlanRequest =
            serde_json::from_value(json!({ "stage": "research", "account_id": "A1" })).unwrap();
        assert_eq!(request.per_namespace_top_k, DEFAULT_TOP_K);
        assert_eq!(request.plan().unwrap().len(), 3);
    }
}
