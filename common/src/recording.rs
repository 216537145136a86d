//! On-disk interchange format for recordings.
//!
//! A recording file is a JSON object holding one shared time column and any
//! number of named traces sampled on it. The stimulus marker channel and the
//! onset list are both optional; an analysis needs at least one of them, or an
//! onset list supplied separately.
use crate::Real;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordingFile {
    pub time: Vec<Real>,
    /// Multiplier converting the stored time column into seconds, for files
    /// whose time column holds sample numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_scale: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stimulus: Option<Vec<Real>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onsets: Option<Vec<Real>>,
    pub traces: Vec<TraceColumn>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TraceColumn {
    pub name: String,
    pub samples: Vec<Real>,
}

impl RecordingFile {
    /// The time column converted to seconds.
    pub fn time_in_seconds(&self) -> Vec<Real> {
        match self.time_scale {
            Some(scale) => self.time.iter().map(|t| t * scale).collect(),
            None => self.time.clone(),
        }
    }
}

/// An external event-time table: a bare JSON array of onset times in seconds.
pub type OnsetFile = Vec<Real>;
