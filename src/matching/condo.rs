use super::normalize::{normalize_bbl, Bbl};
use crate::records::CondoParcelMapping;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Read-only bidirectional index over the Digital Tax Map condominium table.
///
/// In a condominium development each unit may carry its own billing BBL while
/// every unit shares one base BBL, and permits are filed against either side.
/// The directory therefore answers lookups in both directions: billing → base
/// and base → all billing siblings.
#[derive(Debug, Default)]
pub struct CondoDirectory {
    base_by_billing: HashMap<Bbl, Bbl>,
    billing_by_base: HashMap<Bbl, BTreeSet<Bbl>>,
    malformed_mappings: usize,
}

#[derive(Debug)]
pub enum CondoDirectoryError {
    /// A mapping whose base BBL equals its billing BBL would make the parcel
    /// its own sibling. That is corrupt reference data the resolver cannot
    /// reason about.
    SelfReferential { bbl: Bbl },
}

impl fmt::Display for CondoDirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondoDirectoryError::SelfReferential { bbl } => {
                write!(f, "condo mapping lists BBL {bbl} as its own base parcel")
            }
        }
    }
}

impl std::error::Error for CondoDirectoryError {}

impl CondoDirectory {
    pub fn from_mappings(
        mappings: &[CondoParcelMapping],
    ) -> Result<Self, CondoDirectoryError> {
        let mut directory = Self::default();

        for mapping in mappings {
            let base = normalize_bbl(&mapping.base_bbl_raw);
            let billing = normalize_bbl(&mapping.billing_bbl_raw);
            let (Some(base), Some(billing)) = (base, billing) else {
                directory.malformed_mappings += 1;
                tracing::debug!(
                    base = %mapping.base_bbl_raw,
                    billing = %mapping.billing_bbl_raw,
                    "skipping condo mapping with unparseable BBL"
                );
                continue;
            };

            if base == billing {
                return Err(CondoDirectoryError::SelfReferential { bbl: base });
            }

            directory
                .base_by_billing
                .insert(billing.clone(), base.clone());
            directory
                .billing_by_base
                .entry(base)
                .or_default()
                .insert(billing);
        }

        Ok(directory)
    }

    /// Every BBL sharing a condo complex with the input: the input itself,
    /// its base BBL, and all sibling billing BBLs. Empty for non-condo
    /// parcels.
    ///
    /// The lookup is bidirectional: the housing registry sometimes carries a
    /// billing BBL while permits were filed on the base, and sometimes the
    /// reverse. Only checking one side would leave half of real-world condo
    /// cases unresolved.
    pub fn related_bbls(&self, bbl: &Bbl) -> BTreeSet<Bbl> {
        let base = if let Some(base) = self.base_by_billing.get(bbl) {
            Some(base.clone())
        } else if self.billing_by_base.contains_key(bbl) {
            Some(bbl.clone())
        } else {
            None
        };

        let Some(base) = base else {
            return BTreeSet::new();
        };

        let mut related = BTreeSet::new();
        related.insert(bbl.clone());
        related.insert(base.clone());
        if let Some(siblings) = self.billing_by_base.get(&base) {
            related.extend(siblings.iter().cloned());
        }
        related
    }

    /// Mappings dropped at load because either BBL failed normalization.
    pub fn malformed_mappings(&self) -> usize {
        self.malformed_mappings
    }

    pub fn is_empty(&self) -> bool {
        self.base_by_billing.is_empty() && self.billing_by_base.is_empty()
    }
}
