use crate::milestones::columns::{BISWEB_MILESTONE_COLUMNS, DOB_NOW_MILESTONE_COLUMNS};
use crate::records::FilingSource;
use serde::{Deserialize, Serialize};

/// Engine configuration: which literal date columns establish a milestone in
/// each permit registry, and whether amendment filings are filtered out.
///
/// The defaults reproduce the production column sets; overrides exist so a
/// registry schema change is a config edit rather than a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    pub bisweb_milestone_columns: Vec<String>,
    pub dob_now_milestone_columns: Vec<String>,
    /// When set, only original filings (BISWEB doc `01`) establish permit
    /// milestones; amendments and renewals are skipped.
    pub require_original_document: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            bisweb_milestone_columns: BISWEB_MILESTONE_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
            dob_now_milestone_columns: DOB_NOW_MILESTONE_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
            require_original_document: true,
        }
    }
}

impl LinkerConfig {
    pub fn milestone_columns(&self, source: FilingSource) -> &[String] {
        match source {
            FilingSource::Bisweb => &self.bisweb_milestone_columns,
            FilingSource::DobNow => &self.dob_now_milestone_columns,
        }
    }
}
