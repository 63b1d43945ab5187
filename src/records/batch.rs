//! Write batches for a single namespace

use serde::Serialize;
use serde_json::{Map, Value};

use super::vector::VectorMetadata;
use crate::error::{CrewDbError, Result};
use crate::namespace::Namespace;

/// Validated records bound for one vector write call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorWriteBatch {
    namespace: Namespace,
    records: Vec<VectorMetadata>,
}

impl VectorWriteBatch {
    /// Group records for `namespace`, rejecting any that belong elsewhere
    pub fn new(namespace: Namespace, records: Vec<VectorMetadata>) -> Result<Self> {
        if records.is_empty() {
            return Err(CrewDbError::validation(
                "write_batch",
                format!("batch for {} has no records", namespace),
            ));
        }
        if let Some((idx, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.namespace() != namespace)
        {
            return Err(CrewDbError::validation(
                "write_batch",
                format!(
                    "record {} has type '{}' which belongs in '{}', not '{}'",
                    idx,
                    record.record_type(),
                    record.namespace(),
                    namespace
                ),
            ));
        }
        Ok(Self { namespace, records })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn records(&self) -> &[VectorMetadata] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Metadata list for the store's vector write, in record order
    pub fn metadata(&self) -> Result<Vec<Map<String, Value>>> {
        self.records.iter().map(VectorMetadata::to_metadata).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AccountNoteMeta, LeadNoteMeta};

    #[test]
    fn test_batch_accepts_matching_records() {
        let records = vec![
            VectorMetadata::new(LeadNoteMeta::new("A1", "L1"), vec![]).unwrap(),
            VectorMetadata::new(LeadNoteMeta::new("A1", "L2"), vec![]).unwrap(),
        ];
        let batch = VectorWriteBatch::new(Namespace::Leads, records).unwrap();
        assert_eq!(batch.len(), 2);
        let metadata = batch.metadata().unwrap();
        assert_eq!(metadata[1]["lead_id"], "L2");
        assert!(metadata.iter().all(|m| m["type"] == "lead_note"));
    }

    #[test]
    fn test_batch_rejects_foreign_record() {
        let records = vec![
            VectorMetadata::new(LeadNoteMeta::new("A1", "L1"), vec![]).unwrap(),
            VectorMetadata::new(AccountNoteMeta::new("A1"), vec![]).unwrap(),
        ];
        let err = VectorWriteBatch::new(Namespace::Leads, records).unwrap_err();
        assert_eq!(
            err.rule(),
            Some("record 1 has type 'account_note' which belongs in 'accounts', not 'leads'")
        );
    }

    #[test]
    fn test_batch_rejects_empty() {
        assert!(VectorWriteBatch::new(Namespace::Accounts, vec![]).is_err());
    }
}
