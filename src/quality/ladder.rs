//! Priority ladder for data quality flags
//!
//! Stages contribute flags in pipeline order; later rungs outrank earlier
//! ones, so only the highest contribution survives `finalize`.

use crate::models::DataErrorFlag;
use tracing::debug;

/// Accumulates flag contributions from the quality stages
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityLadder {
    current: DataErrorFlag,
}

impl QualityLadder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage's contribution, if any
    pub fn record(&mut self, contribution: Option<DataErrorFlag>) {
        if let Some(flag) = contribution {
            if flag > self.current {
                debug!("Quality flag raised: {} -> {}", self.current, flag);
                self.current = flag;
            }
        }
    }

    /// The single flag reported for the series
    pub fn finalize(self) -> DataErrorFlag {
        self.current
    }
}
