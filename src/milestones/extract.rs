use crate::config::LinkerConfig;
use crate::records::{FilingSource, PermitFiling};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single earliest regulatory date found for one building, with the
/// provenance downstream consumers need to audit which milestone definition
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneResult {
    pub building_id: String,
    pub earliest_date: NaiveDate,
    /// Literal registry column the date came from.
    pub source_column: String,
    pub source_job_number: String,
    pub source: FilingSource,
}

/// Reduces a building's candidate filings to its earliest milestone date.
#[derive(Debug, Clone, Default)]
pub struct MilestoneExtractor {
    config: LinkerConfig,
}

impl MilestoneExtractor {
    pub fn new(config: LinkerConfig) -> Self {
        Self { config }
    }

    /// Picks the minimum non-null date over every valid candidate filing and
    /// every candidate column of that filing's registry.
    ///
    /// Selecting the most recent filing first and then its earliest column
    /// was a historical defect: an older, still-valid filing for the same
    /// building may hold an earlier legitimate date. The scan is therefore
    /// exhaustive over the whole candidate set. Returns `None` when no
    /// surviving filing carries a date, which callers report separately from
    /// "unmatched".
    pub fn extract_earliest(
        &self,
        building_id: &str,
        candidate_filings: &[&PermitFiling],
    ) -> Option<MilestoneResult> {
        let mut earliest: Option<MilestoneResult> = None;

        for filing in candidate_filings {
            if !self.establishes_milestone(filing) {
                continue;
            }

            for column in self.config.milestone_columns(filing.source) {
                let Some(&date) = filing.date_candidates.get(column.as_str()) else {
                    continue;
                };
                let is_earlier = earliest
                    .as_ref()
                    .map(|current| date < current.earliest_date)
                    .unwrap_or(true);
                if is_earlier {
                    earliest = Some(MilestoneResult {
                        building_id: building_id.to_string(),
                        earliest_date: date,
                        source_column: column.clone(),
                        source_job_number: filing.job_number.clone(),
                        source: filing.source,
                    });
                }
            }
        }

        if earliest.is_none() && !candidate_filings.is_empty() {
            tracing::debug!(
                building_id,
                candidates = candidate_filings.len(),
                "no valid filing carried a milestone date"
            );
        }
        earliest
    }

    /// Per-filing validity: withdrawn/abandoned filings never establish a
    /// milestone, and when original-document filtering is on, neither do
    /// BISWEB amendment documents. DOB NOW rows have no document number and
    /// are all original-class.
    fn establishes_milestone(&self, filing: &PermitFiling) -> bool {
        if filing.status.is_terminated() {
            return false;
        }
        if self.config.require_original_document && filing.source == FilingSource::Bisweb {
            return is_original_document(filing.document_type.as_deref());
        }
        true
    }
}

/// BISWEB `doc__` designates the original filing as document 1, but the value
/// arrives as `01`, `1`, or a float artifact depending on how the export was
/// produced. A missing value is treated as original; it cannot be proven to
/// be an amendment.
fn is_original_document(doc: Option<&str>) -> bool {
    let Some(raw) = doc else {
        return true;
    };
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if trimmed.is_empty() {
        return true;
    }
    trimmed.parse::<u32>().map(|value| value == 1).unwrap_or(false)
}
