pub mod columns;
mod extract;
mod occupancy;

pub use extract::{MilestoneExtractor, MilestoneResult};
pub use occupancy::{reduce_earliest, OccupancyResult};
