use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// NYC borough, keyed by the leading digit of a BBL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    StatenIsland,
}

impl Borough {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Manhattan,
            Self::Bronx,
            Self::Brooklyn,
            Self::Queens,
            Self::StatenIsland,
        ]
    }

    /// BBL borough code digit.
    pub const fn code(self) -> char {
        match self {
            Self::Manhattan => '1',
            Self::Bronx => '2',
            Self::Brooklyn => '3',
            Self::Queens => '4',
            Self::StatenIsland => '5',
        }
    }

    /// Uppercase name as used by the DOB registries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manhattan => "MANHATTAN",
            Self::Bronx => "BRONX",
            Self::Brooklyn => "BROOKLYN",
            Self::Queens => "QUEENS",
            Self::StatenIsland => "STATEN ISLAND",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(Self::Manhattan),
            '2' => Some(Self::Bronx),
            '3' => Some(Self::Brooklyn),
            '4' => Some(Self::Queens),
            '5' => Some(Self::StatenIsland),
            _ => None,
        }
    }

    /// Parses a borough name, tolerating case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let cleaned = name.trim().to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|borough| borough.label() == cleaned)
    }
}

/// Which permit-filing registry a record came from. The two registries use
/// different column names for the same milestone concepts, so the source tag
/// drives which candidate columns the extractor consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingSource {
    Bisweb,
    DobNow,
}

impl FilingSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bisweb => "DOB_Job_Applications",
            Self::DobNow => "DOB_NOW",
        }
    }
}

/// Certificate-of-occupancy registry of origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoSource {
    DobCo,
    DobNowCo,
}

impl CoSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DobCo => "DOB_CO",
            Self::DobNowCo => "DOB_NOW_CO",
        }
    }
}

/// Terminal disposition of a permit filing. Withdrawn and abandoned filings
/// never establish a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Active,
    Withdrawn,
    Abandoned,
}

impl FilingStatus {
    /// Classifies a raw registry status string. Anything not recognizably
    /// withdrawn or abandoned is treated as active.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(value) = raw else {
            return Self::Active;
        };
        let upper = value.trim().to_ascii_uppercase();
        if upper.contains("WITHDRAWN") {
            Self::Withdrawn
        } else if upper.contains("ABANDON") {
            Self::Abandoned
        } else {
            Self::Active
        }
    }

    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Withdrawn | Self::Abandoned)
    }
}

/// Certificate-of-occupancy filing class. Renewals are initial-class events:
/// they extend an initial CO rather than closing out the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoFilingType {
    Initial,
    Final,
    Renewal,
}

impl CoFilingType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Final => "Final",
            Self::Renewal => "Renewal",
        }
    }

    /// Classifies the raw filing-type (DOB NOW) or issue-type (legacy CO)
    /// string. Legacy CO rows carry only "Final" or a temporary marker, so
    /// anything that is not recognizably final or a renewal is initial.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(value) = raw else {
            return Self::Initial;
        };
        let lower = value.trim().to_ascii_lowercase();
        if lower.contains("final") {
            Self::Final
        } else if lower.contains("renewal") {
            Self::Renewal
        } else {
            Self::Initial
        }
    }
}

/// Street address carried by an HPD building row, used only by the
/// last-resort address match tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub borough: Option<Borough>,
    pub house_number: Option<String>,
    pub street: Option<String>,
}

impl Address {
    /// Exact-equality join key: (borough, trimmed house number, trimmed
    /// uppercase street). An incomplete address yields no key and therefore
    /// no address-tier match.
    pub fn join_key(&self) -> Option<(Borough, String, String)> {
        let borough = self.borough?;
        let house = self.house_number.as_deref()?.trim().to_string();
        let street = self.street.as_deref()?.trim().to_ascii_uppercase();
        if house.is_empty() || street.is_empty() {
            return None;
        }
        Some((borough, house, street))
    }
}

/// One HPD affordable-housing production building row. Inputs are immutable;
/// the engine annotates copies, never the originals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub building_id: String,
    pub bin_raw: Option<String>,
    pub bbl_raw: Option<String>,
    pub address: Address,
    pub financing_start_date: Option<NaiveDate>,
    pub financing_completion_date: Option<NaiveDate>,
}

/// Decomposed borough/block/lot carried by DOB filing rows, which have no
/// direct BBL column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelComponents {
    pub borough: Option<Borough>,
    pub block: Option<String>,
    pub lot: Option<String>,
}

/// One permit-application row from either DOB registry.
///
/// `date_candidates` maps the registry's literal date column names to parsed
/// dates; only columns enumerated in the source's milestone schema are
/// consulted by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitFiling {
    pub job_number: String,
    pub source: FilingSource,
    pub bin_raw: Option<String>,
    pub parcel: ParcelComponents,
    /// BISWEB `doc__`; `01` marks the original filing, higher numbers are
    /// amendments. DOB NOW filings carry no document number.
    pub document_type: Option<String>,
    pub status: FilingStatus,
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub date_candidates: BTreeMap<String, NaiveDate>,
}

/// One certificate-of-occupancy row from either CO registry, reduced at
/// ingest to the single issuance date both registries express differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyFiling {
    pub bin_raw: Option<String>,
    pub source: CoSource,
    pub job_number: Option<String>,
    pub issuance_date: Option<NaiveDate>,
    pub filing_type: CoFilingType,
}

/// One row of the Digital Tax Map condominium table: a billing BBL and the
/// base BBL its units share. Static reference data, loaded once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondoParcelMapping {
    pub base_bbl_raw: String,
    pub billing_bbl_raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_code_round_trips() {
        for borough in Borough::ordered() {
            assert_eq!(Borough::from_code(borough.code()), Some(borough));
        }
        assert_eq!(Borough::from_code('6'), None);
    }

    #[test]
    fn borough_parse_tolerates_case_and_whitespace() {
        assert_eq!(Borough::parse(" staten island "), Some(Borough::StatenIsland));
        assert_eq!(Borough::parse("BRONX"), Some(Borough::Bronx));
        assert_eq!(Borough::parse("YONKERS"), None);
    }

    #[test]
    fn filing_status_detects_terminated_filings() {
        assert_eq!(
            FilingStatus::from_raw(Some("J- A/P WITHDRAWN")),
            FilingStatus::Withdrawn
        );
        assert_eq!(
            FilingStatus::from_raw(Some("abandoned")),
            FilingStatus::Abandoned
        );
        assert_eq!(FilingStatus::from_raw(Some("R- PERMIT ISSUED")), FilingStatus::Active);
        assert_eq!(FilingStatus::from_raw(None), FilingStatus::Active);
        assert!(FilingStatus::Withdrawn.is_terminated());
        assert!(!FilingStatus::Active.is_terminated());
    }

    #[test]
    fn co_filing_type_classifies_both_registry_vocabularies() {
        assert_eq!(CoFilingType::from_raw(Some("Final")), CoFilingType::Final);
        assert_eq!(
            CoFilingType::from_raw(Some("Initial Certificate of Occupancy")),
            CoFilingType::Initial
        );
        assert_eq!(
            CoFilingType::from_raw(Some("Renewal Without Change")),
            CoFilingType::Renewal
        );
        assert_eq!(CoFilingType::from_raw(Some("Temporary")), CoFilingType::Initial);
        assert_eq!(CoFilingType::from_raw(None), CoFilingType::Initial);
    }

    #[test]
    fn address_join_key_requires_every_component() {
        let complete = Address {
            borough: Some(Borough::Bronx),
            house_number: Some(" 655 ".to_string()),
            street: Some("Morris Avenue".to_string()),
        };
        assert_eq!(
            complete.join_key(),
            Some((Borough::Bronx, "655".to_string(), "MORRIS AVENUE".to_string()))
        );

        let missing_street = Address {
            borough: Some(Borough::Bronx),
            house_number: Some("655".to_string()),
            street: None,
        };
        assert_eq!(missing_street.join_key(), None);

        let blank_house = Address {
            borough: Some(Borough::Bronx),
            house_number: Some("   ".to_string()),
            street: Some("MORRIS AVENUE".to_string()),
        };
        assert_eq!(blank_house.join_key(), None);
    }
}
