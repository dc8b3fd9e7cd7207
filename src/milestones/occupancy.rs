use crate::records::{CoFilingType, CoSource, OccupancyFiling};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Earliest certificate-of-occupancy issuance found for one building, tagged
/// with the filing type and registry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyResult {
    pub building_id: String,
    pub earliest_date: NaiveDate,
    pub filing_type: CoFilingType,
    pub source: CoSource,
    pub source_job_number: Option<String>,
}

/// Reduces a building's certificate-of-occupancy records to the earliest
/// issuance date across both CO registries.
///
/// Same shape as the permit milestone extraction but simpler: each record
/// carries one date and there is no document-type filter; any CO attributed
/// to the building counts.
pub fn reduce_earliest(
    building_id: &str,
    records: &[&OccupancyFiling],
) -> Option<OccupancyResult> {
    let mut earliest: Option<OccupancyResult> = None;

    for record in records {
        let Some(date) = record.issuance_date else {
            continue;
        };
        let is_earlier = earliest
            .as_ref()
            .map(|current| date < current.earliest_date)
            .unwrap_or(true);
        if is_earlier {
            earliest = Some(OccupancyResult {
                building_id: building_id.to_string(),
                earliest_date: date,
                filing_type: record.filing_type,
                source: record.source,
                source_job_number: record.job_number.clone(),
            });
        }
    }

    earliest
}
