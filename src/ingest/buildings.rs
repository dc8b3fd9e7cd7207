use super::{empty_string_as_none, parse_date, IngestError};
use crate::records::{Address, Borough, BuildingRecord};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of the HPD Affordable Housing Production by Building export.
#[derive(Debug, Deserialize)]
struct HpdBuildingRow {
    #[serde(rename = "Project ID", default, deserialize_with = "empty_string_as_none")]
    project_id: Option<String>,
    #[serde(rename = "Project Name", default, deserialize_with = "empty_string_as_none")]
    project_name: Option<String>,
    #[serde(rename = "Building ID", default, deserialize_with = "empty_string_as_none")]
    building_id: Option<String>,
    #[serde(rename = "BIN", default, deserialize_with = "empty_string_as_none")]
    bin: Option<String>,
    #[serde(rename = "BBL", default, deserialize_with = "empty_string_as_none")]
    bbl: Option<String>,
    #[serde(rename = "Borough", default, deserialize_with = "empty_string_as_none")]
    borough: Option<String>,
    #[serde(rename = "Number", default, deserialize_with = "empty_string_as_none")]
    house_number: Option<String>,
    #[serde(rename = "Street", default, deserialize_with = "empty_string_as_none")]
    street: Option<String>,
    #[serde(
        rename = "Project Start Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    project_start_date: Option<String>,
    #[serde(
        rename = "Project Completion Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    project_completion_date: Option<String>,
}

pub fn read_buildings<R: Read>(reader: R) -> Result<Vec<BuildingRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut buildings = Vec::new();

    for record in csv_reader.deserialize::<HpdBuildingRow>() {
        let row = record?;
        let Some(building_id) = row.building_id else {
            tracing::warn!("skipping HPD row without a Building ID");
            continue;
        };

        buildings.push(BuildingRecord {
            project_id: row.project_id,
            project_name: row.project_name,
            building_id,
            bin_raw: row.bin,
            bbl_raw: row.bbl,
            address: Address {
                borough: row.borough.as_deref().and_then(Borough::parse),
                house_number: row.house_number,
                street: row.street,
            },
            financing_start_date: row.project_start_date.as_deref().and_then(parse_date),
            financing_completion_date: row
                .project_completion_date
                .as_deref()
                .and_then(parse_date),
        });
    }

    Ok(buildings)
}

pub fn read_buildings_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BuildingRecord>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_buildings(file)
}
