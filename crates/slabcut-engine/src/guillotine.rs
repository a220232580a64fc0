//! Guillotine shelf packer.
//!
//! Bottom-left placement into horizontal shelves of constant height, filled
//! left to right. Kerf is accounted for between neighbouring parts along a
//! shelf and between shelves; the edge trim shrinks the usable area on all
//! four sides. Placement coordinates are reported in full-sheet coordinates
//! with the trim added back.

use slabcut_model::{CutSettings, Grain, Part, Placement, StockSheet, EPSILON};

/// A single unit to place: one copy of a part with quantity 1.
#[derive(Debug, Clone)]
pub(crate) struct PartUnit {
    pub part: Part,
}

impl PartUnit {
    pub(crate) fn new(part: &Part) -> Self {
        let mut unit = part.clone();
        unit.quantity = 1;
        Self { part: unit }
    }
}

/// An open shelf: a horizontal strip of fixed height, filled left to right.
struct Shelf {
    y: f64,
    height: f64,
    x_cursor: f64,
}

/// Outcome of packing one sheet.
pub(crate) struct SheetPacking {
    pub placements: Vec<Placement>,
    /// Parallel to the input units: true when the unit was placed.
    pub placed: Vec<bool>,
    /// Top edge of the highest shelf, relative to the usable area.
    pub used_height: f64,
}

/// True when the rotation rule permits turning this part by 90 degrees.
pub(crate) fn is_rotatable(part: &Part, settings: &CutSettings) -> bool {
    settings.allow_rotation && (part.grain == Grain::None || !settings.respect_grain)
}

/// Orders part indices the way the shelf packer wants to see them:
/// longest side descending, then area descending, then id.
pub(crate) fn packing_order(units: &[PartUnit]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..units.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&units[a].part, &units[b].part);
        pb.longest_side()
            .partial_cmp(&pa.longest_side())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                pb.area()
                    .partial_cmp(&pa.area())
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then_with(|| pa.id.cmp(&pb.id))
    });
    order
}

/// Packs units onto one stock sheet, in the order given.
///
/// With `forced` set (one flag per unit), each rotatable unit gets exactly
/// the requested orientation and no orientation search happens; this is how
/// the genetic packer decodes a chromosome.
pub(crate) fn pack_sheet(
    units: &[&PartUnit],
    stock: &StockSheet,
    settings: &CutSettings,
    forced: Option<&[bool]>,
) -> SheetPacking {
    let trim = settings.edge_trim;
    let kerf = settings.kerf_width;
    let usable_w = stock.width - 2.0 * trim;
    let usable_h = stock.height - 2.0 * trim;

    let mut packing = SheetPacking {
        placements: Vec::new(),
        placed: vec![false; units.len()],
        used_height: 0.0,
    };
    if usable_w <= EPSILON || usable_h <= EPSILON {
        return packing;
    }

    let mut shelves: Vec<Shelf> = Vec::new();

    for (idx, unit) in units.iter().enumerate() {
        let part = &unit.part;
        let rotatable = is_rotatable(part, settings);

        // Candidate orientations: (rotated, width, height).
        let mut candidates: Vec<(bool, f64, f64)> = Vec::with_capacity(2);
        match forced {
            Some(mask) => {
                let rotated = mask[idx] && rotatable;
                let (w, h) = oriented(part, rotated);
                candidates.push((rotated, w, h));
            }
            None => {
                candidates.push((false, part.width, part.height));
                if rotatable {
                    candidates.push((true, part.height, part.width));
                }
            }
        }

        // First shelf where any orientation fits; among fitting orientations
        // keep the one that leaves the most shelf width.
        let mut chosen: Option<(usize, bool, f64, f64, f64)> = None; // (shelf, rotated, w, h, x)
        'shelves: for (si, shelf) in shelves.iter().enumerate() {
            let x = if shelf.x_cursor > 0.0 {
                shelf.x_cursor + kerf
            } else {
                0.0
            };
            let mut best: Option<(bool, f64, f64)> = None;
            for &(rotated, w, h) in &candidates {
                if h <= shelf.height + EPSILON && x + w <= usable_w + EPSILON {
                    let better = match best {
                        None => true,
                        Some((_, bw, _)) => w < bw,
                    };
                    if better {
                        best = Some((rotated, w, h));
                    }
                }
            }
            if let Some((rotated, w, h)) = best {
                chosen = Some((si, rotated, w, h, x));
                break 'shelves;
            }
        }

        if let Some((si, rotated, w, _h, x)) = chosen {
            packing.placements.push(Placement {
                part: part.clone(),
                x: trim + x,
                y: trim + shelves[si].y,
                rotated,
            });
            shelves[si].x_cursor = x + w;
            packing.placed[idx] = true;
            continue;
        }

        // No existing shelf fits: open a new one. Prefer the orientation
        // with the smaller effective height that still fits.
        let y = match shelves.last() {
            Some(last) => last.y + last.height + kerf,
            None => 0.0,
        };
        let mut best: Option<(bool, f64, f64)> = None;
        for &(rotated, w, h) in &candidates {
            if w <= usable_w + EPSILON && y + h <= usable_h + EPSILON {
                let better = match best {
                    None => true,
                    Some((_, _, bh)) => h < bh,
                };
                if better {
                    best = Some((rotated, w, h));
                }
            }
        }
        if let Some((rotated, w, h)) = best {
            packing.placements.push(Placement {
                part: part.clone(),
                x: trim,
                y: trim + y,
                rotated,
            });
            shelves.push(Shelf {
                y,
                height: h,
                x_cursor: w,
            });
            packing.placed[idx] = true;
        }
        // Otherwise the part stays unplaced on this sheet.
    }

    packing.used_height = shelves.last().map(|s| s.y + s.height).unwrap_or(0.0);
    debug_assert!(placements_are_disjoint(&packing.placements, kerf));
    packing
}

fn oriented(part: &Part, rotated: bool) -> (f64, f64) {
    if rotated {
        (part.height, part.width)
    } else {
        (part.width, part.height)
    }
}

/// Packer contract: no two kerf-inflated placements may overlap.
fn placements_are_disjoint(placements: &[Placement], kerf: f64) -> bool {
    for (i, a) in placements.iter().enumerate() {
        for b in placements.iter().skip(i + 1) {
            if a.rect().inflate(kerf / 2.0).intersects(&b.rect().inflate(kerf / 2.0)) {
                return false;
            }
        }
    }
    true
}
