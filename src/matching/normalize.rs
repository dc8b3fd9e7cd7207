use crate::records::Borough;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical Building Identification Number: exactly seven digits with a
/// valid borough leading digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bin(String);

impl Bin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical borough-block-lot parcel identifier: borough code digit, block
/// zero-padded to five digits, lot zero-padded to five digits. Direct
/// ten-digit BBLs and BBLs reconstructed from decomposed components both
/// normalize to this one representation so they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bbl(String);

impl Bbl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn borough(&self) -> Option<Borough> {
        self.0.chars().next().and_then(Borough::from_code)
    }

    /// Reconstructs a canonical BBL from the decomposed borough/block/lot
    /// columns DOB filing rows carry instead of a BBL value.
    pub fn from_components(borough: Borough, block: &str, lot: &str) -> Option<Self> {
        let block = pad_component(block, 5)?;
        let lot = pad_component(lot, 5)?;
        Some(Self(format!("{}{}{}", borough.code(), block, lot)))
    }
}

impl fmt::Display for Bbl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips surrounding whitespace and the trailing `.0` artifact left behind
/// when an identifier column passed through a floating-point representation
/// upstream.
fn clean_identifier(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(trimmed)
}

/// Zero-pads a numeric block/lot component to `width`. Values that are not
/// numeric, are zero, or exceed the width are absent.
fn pad_component(raw: &str, width: usize) -> Option<String> {
    let cleaned = clean_identifier(raw)?;
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Re-parse to collapse any leading zeros before padding.
    let value: u64 = cleaned.parse().ok()?;
    if value == 0 {
        return None;
    }
    let padded = format!("{value:0width$}");
    if padded.len() > width {
        return None;
    }
    Some(padded)
}

/// Canonicalizes a raw BIN value. Empty, `nan`, non-numeric, or wrong-width
/// values are absent; the literal string "nan" is never a BIN, otherwise
/// every building with a missing identifier would spuriously group together.
pub fn normalize_bin(raw: &str) -> Option<Bin> {
    let cleaned = clean_identifier(raw)?;
    if cleaned.len() != 7 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Borough::from_code(cleaned.chars().next()?)?;
    Some(Bin(cleaned.to_string()))
}

/// Borough-coded sentinel BINs (1000000 through 5000000) mean "no real BIN
/// known" and must never participate in lookups or grouping.
pub fn is_placeholder_bin(bin: &Bin) -> bool {
    let mut chars = bin.as_str().chars();
    let Some(first) = chars.next() else {
        return false;
    };
    Borough::from_code(first).is_some() && chars.all(|c| c == '0')
}

/// Canonicalizes a raw BBL value. Accepts the upstream ten-digit form
/// (borough + five-digit block + four-digit lot) and the already-canonical
/// eleven-character form.
pub fn normalize_bbl(raw: &str) -> Option<Bbl> {
    let cleaned = clean_identifier(raw)?;
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (block_range, lot_range) = match cleaned.len() {
        10 => (1..6, 6..10),
        11 => (1..6, 6..11),
        _ => return None,
    };
    let borough = Borough::from_code(cleaned.chars().next()?)?;
    let block = &cleaned[block_range];
    let lot = &cleaned[lot_range];
    Bbl::from_components(borough, block, lot)
}

/// Checks that a BBL's borough digit agrees with the borough name the row
/// claims. Disagreement indicates an upstream data-quality problem; the BBL's
/// own digit still wins for matching.
pub fn borough_consistent(bbl: &Bbl, borough_name: &str) -> bool {
    match (bbl.borough(), Borough::parse(borough_name)) {
        (Some(from_bbl), Some(claimed)) => from_bbl == claimed,
        _ => false,
    }
}
