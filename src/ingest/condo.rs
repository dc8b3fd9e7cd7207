use super::{empty_string_as_none, IngestError};
use crate::records::CondoParcelMapping;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of the Digital Tax Map condominium table.
#[derive(Debug, Deserialize)]
struct CondoRow {
    #[serde(
        rename = "condo_base_bbl",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    condo_base_bbl: Option<String>,
    #[serde(
        rename = "condo_billing_bbl",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    condo_billing_bbl: Option<String>,
}

pub fn read_condo_mappings<R: Read>(reader: R) -> Result<Vec<CondoParcelMapping>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut mappings = Vec::new();

    for record in csv_reader.deserialize::<CondoRow>() {
        let row = record?;
        let (Some(base), Some(billing)) = (row.condo_base_bbl, row.condo_billing_bbl) else {
            continue;
        };
        mappings.push(CondoParcelMapping {
            base_bbl_raw: base,
            billing_bbl_raw: billing,
        });
    }

    Ok(mappings)
}

pub fn read_condo_mappings_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<CondoParcelMapping>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_condo_mappings(file)
}
