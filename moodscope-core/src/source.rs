//! Where observations come from.
//!
//! Analytics never fetch data themselves. A caller picks an
//! [`ObservationSource`], loads one user's observations, and hands the
//! slice to [`crate::analytics`].

use std::path::Path;

use crate::error::Result;
use crate::time::DateRange;
use crate::types::MoodObservation;

/// Supplies one user's observations, optionally limited to a civil-date window.
///
/// Implementations filter on [`MoodObservation::local_date`], so the window
/// matches the day every report buckets an entry into.
pub trait ObservationSource: Send + Sync {
    fn observations(&self, user_id: &str, window: Option<DateRange>) -> Result<Vec<MoodObservation>>;
}

/// Observations held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    observations: Vec<MoodObservation>,
}

impl MemorySource {
    pub fn new(observations: Vec<MoodObservation>) -> Self {
        Self { observations }
    }

    /// Load a JSON array of observations from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Ok(Self::new(load_json_observations(path)?))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl ObservationSource for MemorySource {
    fn observations(&self, user_id: &str, window: Option<DateRange>) -> Result<Vec<MoodObservation>> {
        Ok(self
            .observations
            .iter()
            .filter(|o| o.user_id == user_id)
            .filter(|o| window.map_or(true, |w| w.contains(o.local_date())))
            .cloned()
            .collect())
    }
}

/// Read a JSON array of observations.
///
/// Unknown mood labels load as neutral and unparsable timestamps load as
/// `None`; a structurally invalid file is an error.
pub fn load_json_observations(path: &Path) -> Result<Vec<MoodObservation>> {
    let content = std::fs::read_to_string(path)?;
    let observations: Vec<MoodObservation> = serde_json::from_str(&content)?;
    tracing::info!(
        path = %path.display(),
        count = observations.len(),
        "Loaded observations from JSON"
    );
    Ok(observations)
}
