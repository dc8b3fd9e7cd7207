//! Links NYC affordable-housing production buildings (HPD) to Department of
//! Buildings permit filings and certificates of occupancy.
//!
//! The two registries frequently disagree on, or are missing, the identifiers
//! that would make the join trivial, so the engine falls back through
//! progressively weaker identifiers — BIN, then BBL, then condo-translated
//! BBL, then exact street address — and reduces each matched building's
//! heterogeneous filing records to a single earliest regulatory date with
//! full provenance.
//!
//! The engine is a pure, synchronous transformation over in-memory records.
//! Fetching, caching, and rendering belong to the surrounding tooling.

pub mod config;
mod error;
pub mod ingest;
pub mod matching;
pub mod milestones;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod telemetry;

pub use config::LinkerConfig;
pub use error::LinkerError;
pub use matching::{CondoDirectory, MatchResult, MatchTier};
pub use milestones::{MilestoneExtractor, MilestoneResult, OccupancyResult};
pub use pipeline::{link_buildings, EnrichedBuilding, LinkageOutput};
pub use report::{DiagnosticsSummary, LinkageDiagnostics};
