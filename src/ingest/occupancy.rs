use super::{empty_string_as_none, parse_date, IngestError};
use crate::records::{CoFilingType, CoSource, OccupancyFiling};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of the legacy DOB Certificate Of Occupancy dataset.
#[derive(Debug, Deserialize)]
struct LegacyCoRow {
    #[serde(rename = "bin_number", default, deserialize_with = "empty_string_as_none")]
    bin: Option<String>,
    #[serde(rename = "job_number", default, deserialize_with = "empty_string_as_none")]
    job_number: Option<String>,
    #[serde(
        rename = "c_o_issue_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    issue_date: Option<String>,
    #[serde(rename = "issue_type", default, deserialize_with = "empty_string_as_none")]
    issue_type: Option<String>,
}

/// One row of the DOB NOW Certificate of Occupancy dataset. Same concept,
/// different column spellings; both must be recognized or half of all
/// occupancy data is silently ignored.
#[derive(Debug, Deserialize)]
struct DobNowCoRow {
    #[serde(rename = "bin", default, deserialize_with = "empty_string_as_none")]
    bin: Option<String>,
    #[serde(
        rename = "job_filing_name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    job_filing_name: Option<String>,
    #[serde(
        rename = "c_of_o_issuance_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    issuance_date: Option<String>,
    #[serde(
        rename = "c_of_o_filing_type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    filing_type: Option<String>,
}

pub fn read_legacy_co<R: Read>(reader: R) -> Result<Vec<OccupancyFiling>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut filings = Vec::new();

    for record in csv_reader.deserialize::<LegacyCoRow>() {
        let row = record?;
        filings.push(OccupancyFiling {
            bin_raw: row.bin,
            source: CoSource::DobCo,
            job_number: row.job_number,
            issuance_date: row.issue_date.as_deref().and_then(parse_date),
            filing_type: CoFilingType::from_raw(row.issue_type.as_deref()),
        });
    }

    Ok(filings)
}

pub fn read_dob_now_co<R: Read>(reader: R) -> Result<Vec<OccupancyFiling>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut filings = Vec::new();

    for record in csv_reader.deserialize::<DobNowCoRow>() {
        let row = record?;
        filings.push(OccupancyFiling {
            bin_raw: row.bin,
            source: CoSource::DobNowCo,
            job_number: row.job_filing_name,
            issuance_date: row.issuance_date.as_deref().and_then(parse_date),
            filing_type: CoFilingType::from_raw(row.filing_type.as_deref()),
        });
    }

    Ok(filings)
}

pub fn read_legacy_co_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<OccupancyFiling>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_legacy_co(file)
}

pub fn read_dob_now_co_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<OccupancyFiling>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_dob_now_co(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn legacy_co_rows_reduce_to_issuance_dates() {
        let csv = "bin_number,job_number,c_o_issue_date,issue_type\n\
2129098,220412541,10/30/2025,Final\n\
2129098,220412541,02/28/2024,\n";

        let filings = read_legacy_co(Cursor::new(csv)).expect("parses");
        assert_eq!(filings.len(), 2);
        assert_eq!(filings[0].source, CoSource::DobCo);
        assert_eq!(filings[0].filing_type, CoFilingType::Final);
        assert_eq!(
            filings[0].issuance_date,
            NaiveDate::from_ymd_opt(2025, 10, 30)
        );
        // Legacy rows without an issue type are initial-class.
        assert_eq!(filings[1].filing_type, CoFilingType::Initial);
    }

    #[test]
    fn dob_now_co_rows_use_the_issuance_spelling() {
        let csv = "bin,job_filing_name,c_of_o_issuance_date,c_of_o_filing_type\n\
2129098,M00012345-I1,2024-02-28T00:00:00.000,Initial Certificate of Occupancy\n";

        let filings = read_dob_now_co(Cursor::new(csv)).expect("parses");
        let filing = &filings[0];
        assert_eq!(filing.source, CoSource::DobNowCo);
        assert_eq!(filing.filing_type, CoFilingType::Initial);
        assert_eq!(
            filing.issuance_date,
            NaiveDate::from_ymd_opt(2024, 2, 28)
        );
    }
}
