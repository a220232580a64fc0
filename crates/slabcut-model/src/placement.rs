//! Optimization results: placements, per-sheet layouts, overall totals.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::part::{Part, StockSheet};

/// One part positioned on one sheet.
///
/// Carries its own copy of the part (quantity 1) so a result stays
/// self-contained after the project's part list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub part: Part,
    /// Lower-left corner in full-sheet coordinates (inside the edge-trim inset).
    pub x: f64,
    pub y: f64,
    /// True when the part is placed height-along-X.
    pub rotated: bool,
}

impl Placement {
    /// Width of the placed bounding rectangle.
    pub fn placed_width(&self) -> f64 {
        if self.rotated {
            self.part.height
        } else {
            self.part.width
        }
    }

    /// Height of the placed bounding rectangle.
    pub fn placed_height(&self) -> f64 {
        if self.rotated {
            self.part.width
        } else {
            self.part.height
        }
    }

    /// The placed rectangle in full-sheet coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.placed_width(), self.placed_height())
    }
}

/// One concrete sheet with the placements the packer accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetResult {
    /// The source stock this sheet was cut from.
    pub stock: StockSheet,
    pub placements: Vec<Placement>,
}

impl SheetResult {
    pub fn new(stock: StockSheet) -> Self {
        Self {
            stock,
            placements: Vec::new(),
        }
    }

    /// One perimeter cut per placement.
    pub fn cut_count(&self) -> usize {
        self.placements.len()
    }

    /// Placed area as a percentage of the full sheet area.
    pub fn efficiency(&self) -> f64 {
        let sheet_area = self.stock.width * self.stock.height;
        if sheet_area <= 0.0 {
            return 0.0;
        }
        let placed: f64 = self.placements.iter().map(|p| p.part.area()).sum();
        placed / sheet_area * 100.0
    }

    /// Per-sheet waste percentage.
    pub fn waste_percent(&self) -> f64 {
        100.0 - self.efficiency()
    }
}

/// The outcome of an optimization run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Sheets in the order stock instances were consumed.
    pub sheets: Vec<SheetResult>,
    /// Parts that did not fit, grouped by source part with residual quantity.
    pub unplaced: Vec<Part>,
}

impl OptimizeResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets_used(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_cuts(&self) -> usize {
        self.sheets.iter().map(|s| s.cut_count()).sum()
    }

    /// Total residual units across the unplaced list.
    pub fn unplaced_count(&self) -> u32 {
        self.unplaced.iter().map(|p| p.quantity).sum()
    }

    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Placed area over the area of every used sheet, in percent.
    /// Zero sheets yields 100% efficiency over nothing, reported as 0 waste.
    pub fn overall_efficiency(&self) -> f64 {
        let sheet_area: f64 = self.sheets.iter().map(|s| s.stock.area()).sum();
        if sheet_area <= 0.0 {
            return 100.0;
        }
        let placed: f64 = self
            .sheets
            .iter()
            .flat_map(|s| &s.placements)
            .map(|p| p.part.area())
            .sum();
        placed / sheet_area * 100.0
    }

    pub fn waste_percent(&self) -> f64 {
        100.0 - self.overall_efficiency()
    }

    /// Total area of every placed unit, mm².
    pub fn placed_area(&self) -> f64 {
        self.sheets
            .iter()
            .flat_map(|s| &s.placements)
            .map(|p| p.part.area())
            .sum()
    }
}
