//! The persisted project: parts, stocks, settings, and the latest result.

use serde::{Deserialize, Serialize};

use crate::part::{Part, StockSheet};
use crate::placement::OptimizeResult;
use crate::settings::CutSettings;

/// Authorship and sharing metadata. Timestamps are RFC3339 strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
    pub version: String,
    pub notes: String,
    /// Author of the shared file this project was imported from, if any.
    pub shared_from: String,
}

/// A complete SlabCut project as saved to disk.
///
/// Unknown JSON fields are ignored on load; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub parts: Vec<Part>,
    pub stocks: Vec<StockSheet>,
    pub settings: CutSettings,
    pub result: Option<OptimizeResult>,
    pub metadata: ProjectMetadata,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Total requested part area in mm² (quantity included).
    pub fn total_part_area(&self) -> f64 {
        self.parts
            .iter()
            .map(|p| p.area() * p.quantity as f64)
            .sum()
    }
}
