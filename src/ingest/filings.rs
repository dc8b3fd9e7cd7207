use super::{empty_string_as_none, parse_date, IngestError};
use crate::records::{Borough, FilingSource, FilingStatus, ParcelComponents, PermitFiling};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One BISWEB job-application row, using the registry's native column names.
#[derive(Debug, Deserialize)]
struct BiswebFilingRow {
    #[serde(rename = "job__", default, deserialize_with = "empty_string_as_none")]
    job_number: Option<String>,
    #[serde(rename = "doc__", default, deserialize_with = "empty_string_as_none")]
    doc: Option<String>,
    #[serde(rename = "bin__", default, deserialize_with = "empty_string_as_none")]
    bin: Option<String>,
    #[serde(rename = "borough", default, deserialize_with = "empty_string_as_none")]
    borough: Option<String>,
    #[serde(rename = "block", default, deserialize_with = "empty_string_as_none")]
    block: Option<String>,
    #[serde(rename = "lot", default, deserialize_with = "empty_string_as_none")]
    lot: Option<String>,
    #[serde(rename = "house__", default, deserialize_with = "empty_string_as_none")]
    house_number: Option<String>,
    #[serde(rename = "street_name", default, deserialize_with = "empty_string_as_none")]
    street_name: Option<String>,
    #[serde(rename = "job_status", default, deserialize_with = "empty_string_as_none")]
    job_status: Option<String>,
    #[serde(
        rename = "pre__filing_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pre_filing_date: Option<String>,
    #[serde(rename = "paid", default, deserialize_with = "empty_string_as_none")]
    paid: Option<String>,
    #[serde(
        rename = "fully_permitted",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    fully_permitted: Option<String>,
    #[serde(rename = "approved", default, deserialize_with = "empty_string_as_none")]
    approved: Option<String>,
}

/// One DOB NOW job-filing row.
#[derive(Debug, Deserialize)]
struct DobNowFilingRow {
    #[serde(
        rename = "job_filing_number",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    job_filing_number: Option<String>,
    #[serde(rename = "bin", default, deserialize_with = "empty_string_as_none")]
    bin: Option<String>,
    #[serde(rename = "borough", default, deserialize_with = "empty_string_as_none")]
    borough: Option<String>,
    #[serde(rename = "block", default, deserialize_with = "empty_string_as_none")]
    block: Option<String>,
    #[serde(rename = "lot", default, deserialize_with = "empty_string_as_none")]
    lot: Option<String>,
    #[serde(rename = "house_no", default, deserialize_with = "empty_string_as_none")]
    house_number: Option<String>,
    #[serde(rename = "street_name", default, deserialize_with = "empty_string_as_none")]
    street_name: Option<String>,
    #[serde(
        rename = "filing_status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    filing_status: Option<String>,
    #[serde(rename = "filing_date", default, deserialize_with = "empty_string_as_none")]
    filing_date: Option<String>,
    #[serde(
        rename = "first_permit_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    first_permit_date: Option<String>,
    #[serde(
        rename = "approved_date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    approved_date: Option<String>,
}

fn date_candidates(pairs: &[(&str, &Option<String>)]) -> BTreeMap<String, chrono::NaiveDate> {
    pairs
        .iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .and_then(parse_date)
                .map(|date| (column.to_string(), date))
        })
        .collect()
}

pub fn read_bisweb_filings<R: Read>(reader: R) -> Result<Vec<PermitFiling>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut filings = Vec::new();

    for record in csv_reader.deserialize::<BiswebFilingRow>() {
        let row = record?;
        let Some(job_number) = row.job_number else {
            tracing::warn!("skipping BISWEB row without a job number");
            continue;
        };

        filings.push(PermitFiling {
            job_number,
            source: FilingSource::Bisweb,
            bin_raw: row.bin,
            parcel: ParcelComponents {
                borough: row.borough.as_deref().and_then(Borough::parse),
                block: row.block,
                lot: row.lot,
            },
            document_type: row.doc,
            status: FilingStatus::from_raw(row.job_status.as_deref()),
            house_number: row.house_number,
            street: row.street_name,
            date_candidates: date_candidates(&[
                ("pre__filing_date", &row.pre_filing_date),
                ("paid", &row.paid),
                ("fully_permitted", &row.fully_permitted),
                ("approved", &row.approved),
            ]),
        });
    }

    Ok(filings)
}

pub fn read_dob_now_filings<R: Read>(reader: R) -> Result<Vec<PermitFiling>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut filings = Vec::new();

    for record in csv_reader.deserialize::<DobNowFilingRow>() {
        let row = record?;
        let Some(job_number) = row.job_filing_number else {
            tracing::warn!("skipping DOB NOW row without a job filing number");
            continue;
        };

        filings.push(PermitFiling {
            job_number,
            source: FilingSource::DobNow,
            bin_raw: row.bin,
            parcel: ParcelComponents {
                borough: row.borough.as_deref().and_then(Borough::parse),
                block: row.block,
                lot: row.lot,
            },
            document_type: None,
            status: FilingStatus::from_raw(row.filing_status.as_deref()),
            house_number: row.house_number,
            street: row.street_name,
            date_candidates: date_candidates(&[
                ("filing_date", &row.filing_date),
                ("first_permit_date", &row.first_permit_date),
                ("approved_date", &row.approved_date),
            ]),
        });
    }

    Ok(filings)
}

pub fn read_bisweb_filings_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<PermitFiling>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_bisweb_filings(file)
}

pub fn read_dob_now_filings_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<PermitFiling>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_dob_now_filings(file)
}
