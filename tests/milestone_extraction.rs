use chrono::NaiveDate;
use housing_linker::matching::{is_placeholder_bin, normalize_bin};
use housing_linker::records::{
    FilingSource, FilingStatus, ParcelComponents, PermitFiling,
};
use housing_linker::{LinkerConfig, MilestoneExtractor};
use std::collections::BTreeMap;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn filing(
    job: &str,
    source: FilingSource,
    doc: Option<&str>,
    dates: &[(&str, NaiveDate)],
) -> PermitFiling {
    PermitFiling {
        job_number: job.to_string(),
        source,
        bin_raw: Some("2129098".to_string()),
        parcel: ParcelComponents::default(),
        document_type: doc.map(str::to_string),
        status: FilingStatus::Active,
        house_number: None,
        street: None,
        date_candidates: dates
            .iter()
            .map(|(column, date)| (column.to_string(), *date))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[test]
fn older_filing_with_earlier_date_beats_newer_filing() {
    // The historical defect: picking the most recent filing first, then its
    // earliest column, returns 2013-12-31 here. The correct answer is the
    // older filing's pre-filing date.
    let older = filing(
        "220124381",
        FilingSource::Bisweb,
        Some("01"),
        &[("pre__filing_date", ymd(2011, 6, 14))],
    );
    let newer = filing(
        "220412541",
        FilingSource::Bisweb,
        Some("01"),
        &[("paid", ymd(2013, 12, 31))],
    );

    let extractor = MilestoneExtractor::new(LinkerConfig::default());
    let result = extractor
        .extract_earliest("927748", &[&newer, &older])
        .expect("milestone");
    assert_eq!(result.earliest_date, ymd(2011, 6, 14));
    assert_eq!(result.source_column, "pre__filing_date");
    assert_eq!(result.source_job_number, "220124381");
}

#[test]
fn document_type_filter_accepts_integer_and_padded_forms() {
    let extractor = MilestoneExtractor::new(LinkerConfig::default());

    let padded = filing(
        "220124381",
        FilingSource::Bisweb,
        Some("01"),
        &[("pre__filing_date", ymd(2011, 6, 14))],
    );
    let integer = filing(
        "220124381",
        FilingSource::Bisweb,
        Some("1"),
        &[("pre__filing_date", ymd(2011, 6, 14))],
    );

    let from_padded = extractor.extract_earliest("927748", &[&padded]).expect("kept");
    let from_integer = extractor.extract_earliest("927748", &[&integer]).expect("kept");
    assert_eq!(from_padded.earliest_date, from_integer.earliest_date);

    let amendment = filing(
        "220124381",
        FilingSource::Bisweb,
        Some("2"),
        &[("pre__filing_date", ymd(2009, 1, 1))],
    );
    assert!(extractor.extract_earliest("927748", &[&amendment]).is_none());
}

#[test]
fn per_source_schemas_keep_registries_from_bleeding_into_each_other() {
    // Custom schema: only the pre-filing date establishes a BISWEB milestone.
    let config = LinkerConfig {
        bisweb_milestone_columns: vec!["pre__filing_date".to_string()],
        ..LinkerConfig::default()
    };
    let extractor = MilestoneExtractor::new(config);

    let paid_only = filing(
        "220412541",
        FilingSource::Bisweb,
        Some("01"),
        &[("paid", ymd(2013, 12, 31))],
    );
    assert!(extractor.extract_earliest("927748", &[&paid_only]).is_none());

    let dob_now = filing(
        "M00012345-I1",
        FilingSource::DobNow,
        None,
        &[("filing_date", ymd(2020, 7, 1))],
    );
    let result = extractor
        .extract_earliest("927748", &[&paid_only, &dob_now])
        .expect("dob now schema unaffected");
    assert_eq!(result.source, FilingSource::DobNow);
}

#[test]
fn normalization_collapses_absence_without_inventing_values() {
    assert_eq!(normalize_bin("nan"), None);
    assert_eq!(normalize_bin("NAN.0"), None);
    assert_eq!(normalize_bin(""), None);

    let placeholder = normalize_bin("3000000").expect("parses");
    assert!(is_placeholder_bin(&placeholder));

    // Two absent identifiers never equality-match each other: there is no
    // canonical value to compare at all.
    assert_eq!(normalize_bin("nan"), normalize_bin("")); // both None
    assert!(normalize_bin("nan").is_none());
}

#[test]
fn withdrawn_filings_never_establish_milestones() {
    let mut withdrawn = filing(
        "220111111",
        FilingSource::Bisweb,
        Some("01"),
        &[("pre__filing_date", ymd(2009, 1, 1))],
    );
    withdrawn.status = FilingStatus::Withdrawn;

    let mut abandoned = filing(
        "M00099999-I1",
        FilingSource::DobNow,
        None,
        &[("filing_date", ymd(2010, 2, 2))],
    );
    abandoned.status = FilingStatus::Abandoned;

    let extractor = MilestoneExtractor::new(LinkerConfig::default());
    assert!(extractor
        .extract_earliest("44409", &[&withdrawn, &abandoned])
        .is_none());
}
