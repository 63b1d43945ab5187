//! Scope identifiers shared by notes, outreach and traces

use serde::{Deserialize, Serialize};

/// Sales scope: which account and lead a record belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

impl SalesScope {
    pub fn account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            lead_id: None,
        }
    }

    pub fn lead(account_id: impl Into<String>, lead_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            lead_id: Some(lead_id.into()),
        }
    }
}

/// Crew scope: which crew execution produced a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl CrewScope {
    pub fn run(crew_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            crew_id: Some(crew_id.into()),
            run_id: Some(run_id.into()),
            ..Default::default()
        }
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}
