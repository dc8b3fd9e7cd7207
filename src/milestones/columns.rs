use crate::records::FilingSource;

/// Literal milestone date columns per permit registry, enumerated once.
///
/// Each registry spells its milestone concepts differently; sniffing column
/// names by substring has repeatedly caused new sources' dates to be silently
/// ignored, so the candidate sets are explicit and closed.
pub const BISWEB_MILESTONE_COLUMNS: &[&str] =
    &["pre__filing_date", "paid", "fully_permitted", "approved"];

pub const DOB_NOW_MILESTONE_COLUMNS: &[&str] =
    &["filing_date", "first_permit_date", "approved_date"];

pub fn default_columns(source: FilingSource) -> &'static [&'static str] {
    match source {
        FilingSource::Bisweb => BISWEB_MILESTONE_COLUMNS,
        FilingSource::DobNow => DOB_NOW_MILESTONE_COLUMNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_sets_are_disjoint_per_source() {
        for column in BISWEB_MILESTONE_COLUMNS {
            assert!(!DOB_NOW_MILESTONE_COLUMNS.contains(column));
        }
    }

    #[test]
    fn default_columns_follow_the_source_tag() {
        assert!(default_columns(FilingSource::Bisweb).contains(&"pre__filing_date"));
        assert!(default_columns(FilingSource::DobNow).contains(&"filing_date"));
    }
}
