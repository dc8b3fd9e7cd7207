use crate::config::LinkerConfig;
use crate::matching::{self, CondoDirectory, MatchResult, MatchTier};
use crate::milestones::{self, MilestoneExtractor, MilestoneResult, OccupancyResult};
use crate::records::{BuildingRecord, OccupancyFiling, PermitFiling};
use crate::report::LinkageDiagnostics;
use serde::Serialize;
use std::collections::HashMap;

/// One building with everything the linkage pass learned about it: the
/// original HPD fields, the match outcome, and the reduced permit and
/// occupancy milestones. This is the engine's sole downstream artifact.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedBuilding {
    #[serde(flatten)]
    pub building: BuildingRecord,
    pub match_tier: MatchTier,
    pub candidate_filing_ids: Vec<String>,
    pub permit_milestone: Option<MilestoneResult>,
    pub occupancy_milestone: Option<OccupancyResult>,
}

#[derive(Debug, Serialize)]
pub struct LinkageOutput {
    pub buildings: Vec<EnrichedBuilding>,
    pub diagnostics: LinkageDiagnostics,
}

/// Runs the full resolve-then-reduce pass: four-tier matching, permit
/// milestone extraction over each building's candidate filings, and
/// occupancy reduction over the CO records sharing the building's BIN.
///
/// Pure function of its inputs; running it twice on identical input yields
/// identical output.
pub fn link_buildings(
    buildings: &[BuildingRecord],
    filings: &[PermitFiling],
    occupancy: &[OccupancyFiling],
    condos: &CondoDirectory,
    config: &LinkerConfig,
) -> LinkageOutput {
    let mut diagnostics = LinkageDiagnostics::default();
    for building in buildings {
        diagnostics.record_building(building);
    }

    let matches = matching::resolve(buildings, filings, condos);

    // Amendment rows share the original's job number, so one candidate id can
    // expand to several filing rows.
    let mut filings_by_job: HashMap<&str, Vec<&PermitFiling>> = HashMap::new();
    for filing in filings {
        filings_by_job
            .entry(filing.job_number.as_str())
            .or_default()
            .push(filing);
    }

    let occupancy_by_bin = occupancy_index(occupancy);
    let extractor = MilestoneExtractor::new(config.clone());

    let enriched = buildings
        .iter()
        .zip(&matches)
        .map(|(building, match_result)| {
            diagnostics.record_match(match_result.tier);

            let permit_milestone =
                extract_permit_milestone(building, match_result, &filings_by_job, &extractor);
            match (&permit_milestone, match_result.tier) {
                (Some(_), _) => diagnostics.permit_milestones_found += 1,
                (None, MatchTier::Unmatched) => {}
                (None, _) => diagnostics.permit_extraction_failures += 1,
            }

            let occupancy_milestone = extract_occupancy_milestone(building, &occupancy_by_bin);
            if occupancy_milestone.is_some() {
                diagnostics.occupancy_milestones_found += 1;
            }

            EnrichedBuilding {
                building: building.clone(),
                match_tier: match_result.tier,
                candidate_filing_ids: match_result.candidate_filing_ids.clone(),
                permit_milestone,
                occupancy_milestone,
            }
        })
        .collect();

    tracing::info!(
        buildings = diagnostics.buildings_seen,
        matched = diagnostics.matched_total(),
        unmatched = diagnostics.unmatched,
        "linkage pass complete"
    );

    LinkageOutput {
        buildings: enriched,
        diagnostics,
    }
}

fn extract_permit_milestone(
    building: &BuildingRecord,
    match_result: &MatchResult,
    filings_by_job: &HashMap<&str, Vec<&PermitFiling>>,
    extractor: &MilestoneExtractor,
) -> Option<MilestoneResult> {
    let candidates: Vec<&PermitFiling> = match_result
        .candidate_filing_ids
        .iter()
        .filter_map(|job| filings_by_job.get(job.as_str()))
        .flatten()
        .copied()
        .collect();
    extractor.extract_earliest(&building.building_id, &candidates)
}

/// Occupancy records are keyed by BIN in both CO registries, so attribution
/// is a BIN join; placeholder BINs are excluded on both sides.
fn occupancy_index(occupancy: &[OccupancyFiling]) -> HashMap<matching::Bin, Vec<&OccupancyFiling>> {
    let mut index: HashMap<matching::Bin, Vec<&OccupancyFiling>> = HashMap::new();
    for record in occupancy {
        let Some(bin) = record.bin_raw.as_deref().and_then(matching::normalize_bin) else {
            continue;
        };
        if matching::is_placeholder_bin(&bin) {
            continue;
        }
        index.entry(bin).or_default().push(record);
    }
    index
}

fn extract_occupancy_milestone(
    building: &BuildingRecord,
    occupancy_by_bin: &HashMap<matching::Bin, Vec<&OccupancyFiling>>,
) -> Option<OccupancyResult> {
    let bin = building
        .bin_raw
        .as_deref()
        .and_then(matching::normalize_bin)
        .filter(|bin| !matching::is_placeholder_bin(bin))?;
    let records = occupancy_by_bin.get(&bin)?;
    milestones::reduce_earliest(&building.building_id, records)
}
