use crate::matching::{is_placeholder_bin, normalize_bbl, normalize_bin, MatchTier};
use crate::matching::normalize::borough_consistent;
use crate::records::BuildingRecord;
use serde::Serialize;

/// Counters accumulated over one linkage pass. Distinguishes "no filings
/// found at any tier" from "filings found but none carried a usable date" so
/// the two failure causes stay auditable.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LinkageDiagnostics {
    pub buildings_seen: usize,
    pub buildings_missing_bin: usize,
    pub buildings_placeholder_bin: usize,
    pub buildings_malformed_bin: usize,
    pub buildings_missing_bbl: usize,
    pub buildings_malformed_bbl: usize,
    pub bbl_borough_mismatches: usize,

    pub matched_structure_id: usize,
    pub matched_parcel_id: usize,
    pub matched_condo_parcel: usize,
    pub matched_address: usize,
    pub unmatched: usize,

    pub permit_milestones_found: usize,
    pub permit_extraction_failures: usize,
    pub occupancy_milestones_found: usize,
}

impl LinkageDiagnostics {
    /// Classifies one building's identifier quality before matching.
    pub fn record_building(&mut self, building: &BuildingRecord) {
        self.buildings_seen += 1;

        match building.bin_raw.as_deref() {
            None => self.buildings_missing_bin += 1,
            Some(raw) => match normalize_bin(raw) {
                Some(bin) if is_placeholder_bin(&bin) => self.buildings_placeholder_bin += 1,
                Some(_) => {}
                None => {
                    // Blank-ish cells are missing identifiers, not malformed ones.
                    let cleaned = raw.trim();
                    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
                        self.buildings_missing_bin += 1;
                    } else {
                        self.buildings_malformed_bin += 1;
                        tracing::debug!(building_id = %building.building_id, bin = raw, "malformed BIN");
                    }
                }
            },
        }

        match building.bbl_raw.as_deref() {
            None => self.buildings_missing_bbl += 1,
            Some(raw) => match normalize_bbl(raw) {
                Some(bbl) => {
                    if let Some(borough) = building.address.borough {
                        if !borough_consistent(&bbl, borough.label()) {
                            self.bbl_borough_mismatches += 1;
                            tracing::warn!(
                                building_id = %building.building_id,
                                bbl = %bbl,
                                claimed = borough.label(),
                                "BBL borough digit contradicts the stated borough"
                            );
                        }
                    }
                }
                None => {
                    let cleaned = raw.trim();
                    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
                        self.buildings_missing_bbl += 1;
                    } else {
                        self.buildings_malformed_bbl += 1;
                        tracing::debug!(building_id = %building.building_id, bbl = raw, "malformed BBL");
                    }
                }
            },
        }
    }

    pub fn record_match(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::StructureId => self.matched_structure_id += 1,
            MatchTier::ParcelId => self.matched_parcel_id += 1,
            MatchTier::CondoParcel => self.matched_condo_parcel += 1,
            MatchTier::Address => self.matched_address += 1,
            MatchTier::Unmatched => self.unmatched += 1,
        }
    }

    pub fn matched_total(&self) -> usize {
        self.matched_structure_id
            + self.matched_parcel_id
            + self.matched_condo_parcel
            + self.matched_address
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        let matched = self.matched_total();
        DiagnosticsSummary {
            buildings_seen: self.buildings_seen,
            matched,
            unmatched: self.unmatched,
            match_rate_percent: percentage(matched, self.buildings_seen),
            tier_counts: [
                TierCount {
                    tier: MatchTier::StructureId,
                    tier_label: MatchTier::StructureId.label(),
                    count: self.matched_structure_id,
                },
                TierCount {
                    tier: MatchTier::ParcelId,
                    tier_label: MatchTier::ParcelId.label(),
                    count: self.matched_parcel_id,
                },
                TierCount {
                    tier: MatchTier::CondoParcel,
                    tier_label: MatchTier::CondoParcel.label(),
                    count: self.matched_condo_parcel,
                },
                TierCount {
                    tier: MatchTier::Address,
                    tier_label: MatchTier::Address.label(),
                    count: self.matched_address,
                },
            ],
            identifier_quality: IdentifierQuality {
                missing_bins: self.buildings_missing_bin,
                placeholder_bins: self.buildings_placeholder_bin,
                malformed_bins: self.buildings_malformed_bin,
                missing_bbls: self.buildings_missing_bbl,
                malformed_bbls: self.buildings_malformed_bbl,
                bbl_borough_mismatches: self.bbl_borough_mismatches,
            },
            permit_milestones_found: self.permit_milestones_found,
            permit_extraction_failures: self.permit_extraction_failures,
            occupancy_milestones_found: self.occupancy_milestones_found,
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierCount {
    pub tier: MatchTier,
    pub tier_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentifierQuality {
    pub missing_bins: usize,
    pub placeholder_bins: usize,
    pub malformed_bins: usize,
    pub missing_bbls: usize,
    pub malformed_bbls: usize,
    pub bbl_borough_mismatches: usize,
}

/// Serializable view of one pass, for reports and structured logs.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSummary {
    pub buildings_seen: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub match_rate_percent: f64,
    pub tier_counts: [TierCount; 4],
    pub identifier_quality: IdentifierQuality,
    pub permit_milestones_found: usize,
    pub permit_extraction_failures: usize,
    pub occupancy_milestones_found: usize,
}

impl DiagnosticsSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
