mod buildings;
mod condo;
mod filings;
mod occupancy;

pub use buildings::{read_buildings, read_buildings_from_path};
pub use condo::{read_condo_mappings, read_condo_mappings_from_path};
pub use filings::{
    read_bisweb_filings, read_bisweb_filings_from_path, read_dob_now_filings,
    read_dob_now_filings_from_path,
};
pub use occupancy::{
    read_dob_now_co, read_dob_now_co_from_path, read_legacy_co, read_legacy_co_from_path,
};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Parses the date spellings the registries actually emit: ISO dates,
/// US-style dates, and ISO timestamps (truncated to the date part).
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Timestamp forms keep only the date portion.
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    let date_part = date_part.split_whitespace().next().unwrap_or(date_part);

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    None
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
