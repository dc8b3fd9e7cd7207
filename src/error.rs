use crate::ingest::IngestError;
use crate::matching::CondoDirectoryError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Top-level error for callers wiring the whole engine together.
#[derive(Debug)]
pub enum LinkerError {
    Ingest(IngestError),
    Condo(CondoDirectoryError),
    Telemetry(TelemetryError),
}

impl fmt::Display for LinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkerError::Ingest(err) => write!(f, "ingest error: {}", err),
            LinkerError::Condo(err) => write!(f, "condo reference data error: {}", err),
            LinkerError::Telemetry(err) => write!(f, "telemetry error: {}", err),
        }
    }
}

impl std::error::Error for LinkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkerError::Ingest(err) => Some(err),
            LinkerError::Condo(err) => Some(err),
            LinkerError::Telemetry(err) => Some(err),
        }
    }
}

impl From<IngestError> for LinkerError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<CondoDirectoryError> for LinkerError {
    fn from(value: CondoDirectoryError) -> Self {
        Self::Condo(value)
    }
}

impl From<TelemetryError> for LinkerError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}
