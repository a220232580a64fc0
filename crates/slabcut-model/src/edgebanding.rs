//! Edge-banding takeoff: linear metres of banding needed for a parts list.

use serde::{Deserialize, Serialize};

use crate::part::Part;

/// Aggregate edge-banding requirement for a parts list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeBandingSummary {
    /// Exact linear requirement, mm.
    pub total_linear_mm: f64,
    /// Requirement including the waste factor, rounded up to whole mm.
    pub total_with_waste_mm: f64,
    /// Number of part units that carry any banding.
    pub part_count: u32,
    /// Total banded edges across all units.
    pub edge_count: u32,
}

/// Per-part line in the edge-banding breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBandingLine {
    pub label: String,
    /// Banding length for one unit, mm.
    pub length_per_unit: f64,
    pub quantity: u32,
    /// Banding length across all units, mm.
    pub total_length: f64,
}

/// Computes the total edge-banding requirement.
///
/// `waste_percent` is added on top of the exact total and the result is
/// rounded up to a whole millimetre.
pub fn calculate_edge_banding(parts: &[Part], waste_percent: f64) -> EdgeBandingSummary {
    let mut summary = EdgeBandingSummary::default();

    for part in parts {
        if !part.edge_banding.has_any() {
            continue;
        }
        let per_unit = part.edge_banding.linear_length(part.width, part.height);
        summary.total_linear_mm += per_unit * part.quantity as f64;
        summary.part_count += part.quantity;
        summary.edge_count += part.edge_banding.edge_count() as u32 * part.quantity;
    }

    summary.total_with_waste_mm = (summary.total_linear_mm * (1.0 + waste_percent / 100.0)).ceil();
    summary
}

/// Per-part breakdown, filtered to parts that have any banding.
pub fn per_part_edge_banding(parts: &[Part]) -> Vec<EdgeBandingLine> {
    parts
        .iter()
        .filter(|p| p.edge_banding.has_any())
        .map(|p| {
            let per_unit = p.edge_banding.linear_length(p.width, p.height);
            EdgeBandingLine {
                label: p.label.clone(),
                length_per_unit: per_unit,
                quantity: p.quantity,
                total_length: per_unit * p.quantity as f64,
            }
        })
        .collect()
}
