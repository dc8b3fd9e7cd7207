use super::condo::CondoDirectory;
use super::normalize::{is_placeholder_bin, normalize_bbl, normalize_bin, Bbl, Bin};
use crate::records::{Borough, BuildingRecord, PermitFiling};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which fallback tier connected a building to its permit filings. Tiers are
/// strictly ordered from strongest to weakest identifier; a building matched
/// at one tier is never re-evaluated at a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    StructureId,
    ParcelId,
    CondoParcel,
    Address,
    Unmatched,
}

impl MatchTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StructureId => "BIN",
            Self::ParcelId => "BBL",
            Self::CondoParcel => "Condo BBL",
            Self::Address => "Address",
            Self::Unmatched => "Unmatched",
        }
    }
}

/// Outcome of one resolution pass for one building. Created once per pass and
/// never mutated; a new pass produces fresh results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub building_id: String,
    pub tier: MatchTier,
    /// Job numbers of every candidate filing found at the winning tier,
    /// deduplicated in filing order. Empty when unmatched.
    pub candidate_filing_ids: Vec<String>,
}

/// Equality-join indexes over the filing set, built once per resolution pass.
struct FilingIndex {
    by_bin: HashMap<Bin, Vec<usize>>,
    by_bbl: HashMap<Bbl, Vec<usize>>,
    by_address: HashMap<(Borough, String, String), Vec<usize>>,
}

impl FilingIndex {
    fn build(filings: &[PermitFiling]) -> Self {
        let mut by_bin: HashMap<Bin, Vec<usize>> = HashMap::new();
        let mut by_bbl: HashMap<Bbl, Vec<usize>> = HashMap::new();
        let mut by_address: HashMap<(Borough, String, String), Vec<usize>> = HashMap::new();

        for (idx, filing) in filings.iter().enumerate() {
            if let Some(bin) = filing.bin_raw.as_deref().and_then(normalize_bin) {
                // Placeholder BINs on the filing side must not become
                // matchable values either.
                if !is_placeholder_bin(&bin) {
                    by_bin.entry(bin).or_default().push(idx);
                }
            }

            if let Some(bbl) = filing_bbl(filing) {
                by_bbl.entry(bbl).or_default().push(idx);
            }

            if let Some(key) = filing_address_key(filing) {
                by_address.entry(key).or_default().push(idx);
            }
        }

        Self {
            by_bin,
            by_bbl,
            by_address,
        }
    }
}

/// Reconstructs the filing's canonical BBL from its decomposed
/// borough/block/lot columns.
fn filing_bbl(filing: &PermitFiling) -> Option<Bbl> {
    let borough = filing.parcel.borough?;
    let block = filing.parcel.block.as_deref()?;
    let lot = filing.parcel.lot.as_deref()?;
    Bbl::from_components(borough, block, lot)
}

fn filing_address_key(filing: &PermitFiling) -> Option<(Borough, String, String)> {
    let borough = filing.parcel.borough?;
    let house = filing.house_number.as_deref()?.trim().to_string();
    let street = filing.street.as_deref()?.trim().to_ascii_uppercase();
    if house.is_empty() || street.is_empty() {
        return None;
    }
    Some((borough, house, street))
}

/// Resolves each building to its candidate permit filings through four
/// strictly ordered fallback tiers: BIN equality, BBL equality,
/// condo-expanded BBL equality, then exact address equality. Pure function
/// of its inputs plus the prebuilt condo directory; every building yields
/// exactly one result, `Unmatched` being an expected terminal state rather
/// than an error.
pub fn resolve(
    buildings: &[BuildingRecord],
    filings: &[PermitFiling],
    condos: &CondoDirectory,
) -> Vec<MatchResult> {
    let index = FilingIndex::build(filings);

    buildings
        .iter()
        .map(|building| resolve_building(building, filings, &index, condos))
        .collect()
}

fn resolve_building(
    building: &BuildingRecord,
    filings: &[PermitFiling],
    index: &FilingIndex,
    condos: &CondoDirectory,
) -> MatchResult {
    let bin = building
        .bin_raw
        .as_deref()
        .and_then(normalize_bin)
        .filter(|bin| !is_placeholder_bin(bin));
    let bbl = building.bbl_raw.as_deref().and_then(normalize_bbl);

    // Tier 1: BIN equality.
    if let Some(bin) = &bin {
        if let Some(matches) = index.by_bin.get(bin) {
            if !matches.is_empty() {
                return result(building, MatchTier::StructureId, matches, filings);
            }
        }
    }

    // Tier 2: BBL equality, reconstructed filing BBLs included.
    if let Some(bbl) = &bbl {
        if let Some(matches) = index.by_bbl.get(bbl) {
            if !matches.is_empty() {
                return result(building, MatchTier::ParcelId, matches, filings);
            }
        }
    }

    // Tier 3: condo-expanded BBL set.
    if let Some(bbl) = &bbl {
        let related = condos.related_bbls(bbl);
        if !related.is_empty() {
            let mut matches: Vec<usize> = related
                .iter()
                .filter_map(|candidate| index.by_bbl.get(candidate))
                .flatten()
                .copied()
                .collect();
            matches.sort_unstable();
            matches.dedup();
            if !matches.is_empty() {
                return result(building, MatchTier::CondoParcel, &matches, filings);
            }
        }
    }

    // Tier 4: exact address equality only. A building whose address is
    // incomplete yields no key and cannot match here.
    if let Some(key) = building.address.join_key() {
        if let Some(matches) = index.by_address.get(&key) {
            if !matches.is_empty() {
                return result(building, MatchTier::Address, matches, filings);
            }
        }
    }

    tracing::debug!(building_id = %building.building_id, "no filings found at any tier");
    MatchResult {
        building_id: building.building_id.clone(),
        tier: MatchTier::Unmatched,
        candidate_filing_ids: Vec::new(),
    }
}

fn result(
    building: &BuildingRecord,
    tier: MatchTier,
    filing_indices: &[usize],
    filings: &[PermitFiling],
) -> MatchResult {
    let mut candidate_filing_ids: Vec<String> = Vec::new();
    for &idx in filing_indices {
        let job_number = &filings[idx].job_number;
        if !candidate_filing_ids.iter().any(|id| id == job_number) {
            candidate_filing_ids.push(job_number.clone());
        }
    }

    MatchResult {
        building_id: building.building_id.clone(),
        tier,
        candidate_filing_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Address, FilingSource, FilingStatus, ParcelComponents};
    use std::collections::BTreeMap;

    fn building(id: &str, bin: Option<&str>, bbl: Option<&str>) -> BuildingRecord {
        BuildingRecord {
            project_id: Some("44223".to_string()),
            project_name: Some("Morris Avenue Apartments".to_string()),
            building_id: id.to_string(),
            bin_raw: bin.map(str::to_string),
            bbl_raw: bbl.map(str::to_string),
            address: Address::default(),
            financing_start_date: None,
            financing_completion_date: None,
        }
    }

    fn filing(job: &str, bin: Option<&str>) -> PermitFiling {
        PermitFiling {
            job_number: job.to_string(),
            source: FilingSource::Bisweb,
            bin_raw: bin.map(str::to_string),
            parcel: ParcelComponents::default(),
            document_type: Some("01".to_string()),
            status: FilingStatus::Active,
            house_number: None,
            street: None,
            date_candidates: BTreeMap::new(),
        }
    }

    fn filing_with_parcel(job: &str, borough: Borough, block: &str, lot: &str) -> PermitFiling {
        let mut filing = filing(job, None);
        filing.parcel = ParcelComponents {
            borough: Some(borough),
            block: Some(block.to_string()),
            lot: Some(lot.to_string()),
        };
        filing
    }

    fn empty_condos() -> CondoDirectory {
        CondoDirectory::from_mappings(&[]).expect("empty directory")
    }

    #[test]
    fn bin_match_wins_over_weaker_tiers() {
        let mut target = filing_with_parcel("220412541", Borough::Bronx, "2441", "1");
        target.bin_raw = Some("2129098".to_string());
        let buildings = [building("927748", Some("2129098"), Some("2024410001"))];
        let filings = [target, filing("100000001", Some("1087654"))];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tier, MatchTier::StructureId);
        assert_eq!(results[0].candidate_filing_ids, vec!["220412541".to_string()]);
    }

    #[test]
    fn bbl_fallback_applies_only_when_bin_finds_nothing() {
        let buildings = [building("44409", Some("2098765"), Some("2024410001"))];
        let filings = [filing_with_parcel("220300100", Borough::Bronx, "2441", "1")];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(results[0].tier, MatchTier::ParcelId);
        assert_eq!(results[0].candidate_filing_ids, vec!["220300100".to_string()]);
    }

    #[test]
    fn placeholder_bin_never_matches_even_when_both_sides_carry_it() {
        let buildings = [building("11", Some("2000000"), None)];
        let filings = [filing("220999999", Some("2000000"))];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(results[0].tier, MatchTier::Unmatched);
        assert!(results[0].candidate_filing_ids.is_empty());
    }

    #[test]
    fn missing_bin_never_matches_missing_bin() {
        let buildings = [building("11", None, None), building("12", Some("nan"), None)];
        let filings = [filing("220999999", None), filing("220999998", Some("nan"))];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert!(results.iter().all(|r| r.tier == MatchTier::Unmatched));
    }

    #[test]
    fn condo_tier_matches_sibling_billing_parcel() {
        let condos = CondoDirectory::from_mappings(&[crate::records::CondoParcelMapping {
            base_bbl_raw: "2024410001".to_string(),
            billing_bbl_raw: "2024417504".to_string(),
        }])
        .expect("valid mapping");

        // Building carries the billing BBL, permit was filed on the base.
        let buildings = [building("75925", None, Some("2024417504"))];
        let filings = [filing_with_parcel("220124381", Borough::Bronx, "2441", "1")];

        let results = resolve(&buildings, &filings, &condos);
        assert_eq!(results[0].tier, MatchTier::CondoParcel);
        assert_eq!(results[0].candidate_filing_ids, vec!["220124381".to_string()]);
    }

    #[test]
    fn address_tier_requires_exact_equality() {
        let mut buildings = [building("88", None, None)];
        buildings[0].address = Address {
            borough: Some(Borough::Bronx),
            house_number: Some("655".to_string()),
            street: Some("Morris Avenue".to_string()),
        };

        let mut exact = filing_with_parcel("221111111", Borough::Bronx, "2441", "1");
        exact.house_number = Some("655".to_string());
        exact.street = Some("MORRIS AVENUE".to_string());

        let mut near_miss = filing_with_parcel("222222222", Borough::Bronx, "2441", "2");
        near_miss.house_number = Some("657".to_string());
        near_miss.street = Some("MORRIS AVENUE".to_string());

        let results = resolve(&buildings, &[exact, near_miss], &empty_condos());
        assert_eq!(results[0].tier, MatchTier::Address);
        assert_eq!(results[0].candidate_filing_ids, vec!["221111111".to_string()]);
    }

    #[test]
    fn buildings_sharing_a_bin_both_receive_the_candidate_set() {
        let buildings = [
            building("1", Some("2129098"), None),
            building("2", Some("2129098"), None),
        ];
        let filings = [filing("220412541", Some("2129098"))];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(results[0].tier, MatchTier::StructureId);
        assert_eq!(results[1].tier, MatchTier::StructureId);
        assert_eq!(
            results[0].candidate_filing_ids,
            results[1].candidate_filing_ids
        );
    }

    #[test]
    fn duplicate_job_rows_collapse_to_one_candidate_id() {
        // Amendment rows share the job number of the original filing.
        let mut amendment = filing("220412541", Some("2129098"));
        amendment.document_type = Some("02".to_string());
        let buildings = [building("927748", Some("2129098"), None)];
        let filings = [filing("220412541", Some("2129098")), amendment];

        let results = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(results[0].candidate_filing_ids, vec!["220412541".to_string()]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let buildings = [
            building("927748", Some("2129098"), Some("2024410001")),
            building("44409", None, Some("2024410001")),
            building("11", None, None),
        ];
        let filings = [
            filing("220412541", Some("2129098")),
            filing_with_parcel("220300100", Borough::Bronx, "2441", "1"),
        ];

        let first = resolve(&buildings, &filings, &empty_condos());
        let second = resolve(&buildings, &filings, &empty_condos());
        assert_eq!(first, second);
    }
}
