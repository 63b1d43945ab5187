//! Namespace registry
//!
//! The store partitions vector data into six namespaces. Each one holds a
//! single record type, and the mapping from logical name to store identifier
//! is fixed for the life of the process.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::types::RecordType;

/// A vector namespace in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Namespace {
    #[serde(rename = "sales_playbooks")]
    Playbooks,
    #[serde(rename = "sales_cases")]
    CaseStudies,
    #[serde(rename = "accounts")]
    Accounts,
    #[serde(rename = "leads")]
    Leads,
    #[serde(rename = "outreach_history")]
    OutreachHistory,
    #[serde(rename = "crew_runs")]
    RunArtifacts,
}

/// Logical name -> store identifier, built once on first use
pub static NAMESPACE_MAP: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    Namespace::ALL
        .iter()
        .map(|ns| (ns.logical_name(), ns.as_str()))
        .collect()
});

impl Namespace {
    pub const ALL: [Namespace; 6] = [
        Namespace::Playbooks,
        Namespace::CaseStudies,
        Namespace::Accounts,
        Namespace::Leads,
        Namespace::OutreachHistory,
        Namespace::RunArtifacts,
    ];

    /// Identifier used by the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Playbooks => "sales_playbooks",
            Namespace::CaseStudies => "sales_cases",
            Namespace::Accounts => "accounts",
            Namespace::Leads => "leads",
            Namespace::OutreachHistory => "outreach_history",
            Namespace::RunArtifacts => "crew_runs",
        }
    }

    /// Registry key, e.g. `OUTREACH_HISTORY`
    pub fn logical_name(&self) -> &'static str {
        match self {
            Namespace::Playbooks => "PLAYBOOKS",
            Namespace::CaseStudies => "CASE_STUDIES",
            Namespace::Accounts => "ACCOUNTS",
            Namespace::Leads => "LEADS",
            Namespace::OutreachHistory => "OUTREACH_HISTORY",
            Namespace::RunArtifacts => "RUN_ARTIFACTS",
        }
    }

    /// The only record type stored in this namespace
    pub fn record_type(&self) -> RecordType {
        match self {
            Namespace::Playbooks => RecordType::Playbook,
            Namespace::CaseStudies => RecordType::CaseStudy,
            Namespace::Accounts => RecordType::AccountNote,
            Namespace::Leads => RecordType::LeadNote,
            Namespace::OutreachHistory => RecordType::Outreach,
            Namespace::RunArtifacts => RecordType::Trace,
        }
    }

    pub fn for_record_type(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Playbook => Namespace::Playbooks,
            RecordType::CaseStudy => Namespace::CaseStudies,
            RecordType::AccountNote => Namespace::Accounts,
            RecordType::LeadNote => Namespace::Leads,
            RecordType::Outreach => Namespace::OutreachHistory,
            RecordType::Trace => Namespace::RunArtifacts,
        }
    }

    /// Look up a namespace by its registry key (case-sensitive)
    pub fn from_logical_name(name: &str) -> Option<Self> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.logical_name() == name)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    /// Accepts either the store identifier or the registry key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s || ns.logical_name() == s)
            .ok_or_else(|| format!("Unknown namespace: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contents() {
        assert_eq!(NAMESPACE_MAP.len(), 6);
        assert_eq!(NAMESPACE_MAP["PLAYBOOKS"], "sales_playbooks");
        assert_eq!(NAMESPACE_MAP["CASE_STUDIES"], "sales_cases");
        assert_eq!(NAMESPACE_MAP["ACCOUNTS"], "accounts");
        assert_eq!(NAMESPACE_MAP["LEADS"], "leads");
        assert_eq!(NAMESPACE_MAP["OUTREACH_HISTORY"], "outreach_history");
        assert_eq!(NAMESPACE_MAP["RUN_ARTIFACTS"], "crew_runs");
    }

    #[test]
    fn test_record_type_mapping_is_bijective() {
        for ns in Namespace::ALL {
            assert_eq!(Namespace::for_record_type(ns.record_type()), ns);
        }
    }

    #[test]
    fn test_parse_either_name() {
        assert_eq!("crew_runs".parse::<Namespace>(), Ok(Namespace::RunArtifacts));
        assert_eq!("RUN_ARTIFACTS".parse::<Namespace>(), Ok(Namespace::RunArtifacts));
        assert!("runs".parse::<Namespace>().is_err());
        assert_eq!(Namespace::from_logical_name("LEADS"), Some(Namespace::Leads));
        assert_eq!(Namespace::from_logical_name("leads"), None);
    }

    #[test]
    fn test_serializes_as_store_identifier() {
        let json = serde_json::to_value(Namespace::CaseStudies).unwrap();
        assert_eq!(json, "sales_cases");
    }
}
