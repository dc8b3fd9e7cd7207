pub mod condo;
mod matcher;
pub mod normalize;

pub use condo::{CondoDirectory, CondoDirectoryError};
pub use matcher::{resolve, MatchResult, MatchTier};
pub use normalize::{is_placeholder_bin, normalize_bbl, normalize_bin, Bbl, Bin};
