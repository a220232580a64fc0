//! Parts and stock sheets.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::geometry::Outline;

/// Grain direction of a part.
///
/// A part with a grain preference cannot be rotated by the packer while
/// `respect_grain` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grain {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grain::None => write!(f, "None"),
            Grain::Horizontal => write!(f, "Horizontal"),
            Grain::Vertical => write!(f, "Vertical"),
        }
    }
}

/// Edge-banding flags for the four sides of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeBanding {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl EdgeBanding {
    /// True when at least one side is banded.
    pub fn has_any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    /// Number of banded sides.
    pub fn edge_count(&self) -> usize {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    /// Linear banding length for one part of the given dimensions.
    /// Top and bottom contribute the width, left and right the height.
    pub fn linear_length(&self, width: f64, height: f64) -> f64 {
        let mut total = 0.0;
        if self.top {
            total += width;
        }
        if self.bottom {
            total += width;
        }
        if self.left {
            total += height;
        }
        if self.right {
            total += height;
        }
        total
    }
}

impl fmt::Display for EdgeBanding {
    /// Compact side list, e.g. "T+B+L+R" or "None".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sides = Vec::new();
        if self.top {
            sides.push("T");
        }
        if self.bottom {
            sides.push("B");
        }
        if self.left {
            sides.push("L");
        }
        if self.right {
            sides.push("R");
        }
        if sides.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", sides.join("+"))
        }
    }
}

/// A rectangular part to cut, with a requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    pub id: String,
    pub label: String,
    /// Width in mm, along sheet X when unrotated.
    pub width: f64,
    /// Height in mm, along sheet Y when unrotated.
    pub height: f64,
    pub quantity: u32,
    pub grain: Grain,
    /// Imported outline, if the part came from a DXF drawing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    pub edge_banding: EdgeBanding,
}

impl Default for Part {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            width: 0.0,
            height: 0.0,
            quantity: 1,
            grain: Grain::None,
            outline: None,
            edge_banding: EdgeBanding::default(),
        }
    }
}

impl Part {
    /// Creates a part with a fresh 8-character id.
    pub fn new(label: impl Into<String>, width: f64, height: f64, quantity: u32) -> Self {
        Self {
            id: short_id(),
            label: label.into(),
            width,
            height,
            quantity,
            ..Default::default()
        }
    }

    /// Sets the grain direction.
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    /// Sets the edge-banding flags.
    pub fn with_edge_banding(mut self, banding: EdgeBanding) -> Self {
        self.edge_banding = banding;
        self
    }

    /// Area of a single unit in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The longer of the two dimensions.
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Validates dimensions and quantity.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(Error::InvalidInput(format!(
                "part {:?}: dimensions must be positive ({} x {})",
                self.label, self.width, self.height
            )));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidInput(format!(
                "part {:?}: quantity must be at least 1",
                self.label
            )));
        }
        Ok(())
    }
}

/// A raw stock sheet with an available quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSheet {
    pub id: String,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
}

impl Default for StockSheet {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            width: 0.0,
            height: 0.0,
            quantity: 1,
        }
    }
}

impl StockSheet {
    /// Creates a stock sheet with a fresh 8-character id.
    pub fn new(label: impl Into<String>, width: f64, height: f64, quantity: u32) -> Self {
        Self {
            id: short_id(),
            label: label.into(),
            width,
            height,
            quantity,
        }
    }

    /// Full sheet area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Validates dimensions and quantity.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(Error::InvalidInput(format!(
                "stock {:?}: dimensions must be positive ({} x {})",
                self.label, self.width, self.height
            )));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidInput(format!(
                "stock {:?}: quantity must be at least 1",
                self.label
            )));
        }
        Ok(())
    }
}

/// An 8-character hex id, unique enough for parts within one project.
pub(crate) fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_new_generates_id() {
        let a = Part::new("Shelf", 800.0, 300.0, 2);
        let b = Part::new("Shelf", 800.0, 300.0, 2);
        assert_eq!(a.id.len(), 8);
        assert_ne!(a.id, b.id);
        assert_eq!(a.grain, Grain::None);
    }

    #[test]
    fn test_part_validate() {
        assert!(Part::new("ok", 100.0, 50.0, 1).validate().is_ok());
        assert!(Part::new("bad", 0.0, 50.0, 1).validate().is_err());
        assert!(Part::new("bad", 100.0, -1.0, 1).validate().is_err());
        assert!(Part::new("bad", 100.0, 50.0, 0).validate().is_err());
    }

    #[test]
    fn test_stock_validate() {
        assert!(StockSheet::new("board", 2440.0, 1220.0, 1).validate().is_ok());
        assert!(StockSheet::new("bad", -5.0, 1220.0, 1).validate().is_err());
        assert!(StockSheet::new("bad", 2440.0, 1220.0, 0).validate().is_err());
    }

    #[test]
    fn test_edge_banding_has_any() {
        assert!(!EdgeBanding::default().has_any());
        let top = EdgeBanding {
            top: true,
            ..Default::default()
        };
        assert!(top.has_any());
    }

    #[test]
    fn test_edge_banding_edge_count() {
        let cases = [
            (EdgeBanding::default(), 0),
            (
                EdgeBanding {
                    top: true,
                    ..Default::default()
                },
                1,
            ),
            (
                EdgeBanding {
                    top: true,
                    bottom: true,
                    ..Default::default()
                },
                2,
            ),
            (
                EdgeBanding {
                    top: true,
                    bottom: true,
                    left: true,
                    right: true,
                },
                4,
            ),
        ];
        for (eb, want) in cases {
            assert_eq!(eb.edge_count(), want);
        }
    }

    #[test]
    fn test_edge_banding_linear_length() {
        let all = EdgeBanding {
            top: true,
            bottom: true,
            left: true,
            right: true,
        };
        // top(800) + bottom(800) + left(400) + right(400)
        assert_eq!(all.linear_length(800.0, 400.0), 2400.0);

        let two = EdgeBanding {
            top: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(two.linear_length(600.0, 300.0), 900.0);
    }

    #[test]
    fn test_edge_banding_display() {
        let cases = [
            (EdgeBanding::default(), "None"),
            (
                EdgeBanding {
                    top: true,
                    ..Default::default()
                },
                "T",
            ),
            (
                EdgeBanding {
                    top: true,
                    bottom: true,
                    ..Default::default()
                },
                "T+B",
            ),
            (
                EdgeBanding {
                    top: true,
                    bottom: true,
                    left: true,
                    right: true,
                },
                "T+B+L+R",
            ),
            (
                EdgeBanding {
                    left: true,
                    right: true,
                    ..Default::default()
                },
                "L+R",
            ),
        ];
        for (eb, want) in cases {
            assert_eq!(eb.to_string(), want);
        }
    }
}
