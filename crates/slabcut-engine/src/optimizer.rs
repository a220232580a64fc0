//! Optimize driver: expands quantities, walks the stock queue, and runs the
//! selected packer until parts or stock run out.

use slabcut_model::{
    Algorithm, CutSettings, OptimizeResult, Part, Result, SheetResult, StockSheet,
};

use crate::genetic;
use crate::guillotine::{pack_sheet, packing_order, PartUnit};

/// Runs the configured packing algorithm over the given parts and stock.
///
/// Parts larger than every stock are not an error; they come back in
/// [`OptimizeResult::unplaced`] with their residual quantity.
pub fn optimize(
    parts: &[Part],
    stocks: &[StockSheet],
    settings: &CutSettings,
) -> Result<OptimizeResult> {
    settings.validate()?;
    for part in parts {
        part.validate()?;
    }
    for stock in stocks {
        stock.validate()?;
    }

    let units = expand_parts(parts);
    let queue = expand_stocks(stocks);

    match settings.algorithm {
        Algorithm::Guillotine => {
            let order = packing_order(&units);
            let ordered: Vec<&PartUnit> = order.iter().map(|&i| &units[i]).collect();
            Ok(pack_all(&ordered, &queue, settings, None).result)
        }
        Algorithm::Genetic => Ok(genetic::run(&units, &queue, settings).result),
    }
}

/// One entry per requested unit, keeping the source part's identity.
pub(crate) fn expand_parts(parts: &[Part]) -> Vec<PartUnit> {
    let mut units = Vec::new();
    for part in parts {
        for _ in 0..part.quantity {
            units.push(PartUnit::new(part));
        }
    }
    units
}

/// One entry per available sheet instance.
pub(crate) fn expand_stocks(stocks: &[StockSheet]) -> Vec<StockSheet> {
    let mut queue = Vec::new();
    for stock in stocks {
        for _ in 0..stock.quantity {
            let mut instance = stock.clone();
            instance.quantity = 1;
            queue.push(instance);
        }
    }
    queue
}

/// Multi-sheet packing outcome, with the shelf-height total the genetic
/// fitness uses as a tie-break.
pub(crate) struct PackOutcome {
    pub result: OptimizeResult,
    pub total_used_height: f64,
}

/// Packs every stock instance in turn, removing accepted units as it goes.
/// Units are consumed in the order given; `forced` (parallel to `units`)
/// pins each unit's orientation.
pub(crate) fn pack_all(
    units: &[&PartUnit],
    queue: &[StockSheet],
    settings: &CutSettings,
    forced: Option<&[bool]>,
) -> PackOutcome {
    let mut remaining: Vec<usize> = (0..units.len()).collect();
    let mut sheets = Vec::new();
    let mut total_used_height = 0.0;

    for stock in queue {
        if remaining.is_empty() {
            break;
        }

        let view: Vec<&PartUnit> = remaining.iter().map(|&i| units[i]).collect();
        let mask: Option<Vec<bool>> =
            forced.map(|f| remaining.iter().map(|&i| f[i]).collect());
        let packing = pack_sheet(&view, stock, settings, mask.as_deref());

        if packing.placements.is_empty() {
            // Nothing fits this instance; a differently sized stock later in
            // the queue may still accept parts.
            continue;
        }

        let mut sheet = SheetResult::new(stock.clone());
        sheet.placements = packing.placements;
        sheets.push(sheet);
        total_used_height += packing.used_height;

        remaining = remaining
            .iter()
            .zip(&packing.placed)
            .filter(|(_, &placed)| !placed)
            .map(|(&i, _)| i)
            .collect();
    }

    let unplaced = group_unplaced(units, &remaining);
    PackOutcome {
        result: OptimizeResult { sheets, unplaced },
        total_used_height,
    }
}

/// Groups leftover units back into parts with residual quantities, in
/// first-seen order of the source part id.
fn group_unplaced(units: &[&PartUnit], remaining: &[usize]) -> Vec<Part> {
    let mut grouped: Vec<Part> = Vec::new();
    for &i in remaining {
        let part = &units[i].part;
        match grouped.iter_mut().find(|p| p.id == part.id) {
            Some(existing) => existing.quantity += 1,
            None => grouped.push(part.clone()),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_parts() {
        let parts = vec![Part::new("A", 10.0, 10.0, 3), Part::new("B", 20.0, 20.0, 1)];
        let units = expand_parts(&parts);
        assert_eq!(units.len(), 4);
        assert!(units.iter().all(|u| u.part.quantity == 1));
        assert_eq!(units[0].part.id, units[2].part.id);
    }

    #[test]
    fn test_expand_stocks() {
        let stocks = vec![StockSheet::new("S", 100.0, 100.0, 2)];
        let queue = expand_stocks(&stocks);
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|s| s.quantity == 1));
    }

    #[test]
    fn test_optimize_rejects_invalid_input() {
        let parts = vec![Part::new("bad", -1.0, 10.0, 1)];
        let stocks = vec![StockSheet::new("S", 100.0, 100.0, 1)];
        assert!(optimize(&parts, &stocks, &CutSettings::default()).is_err());

        let mut settings = CutSettings::default();
        settings.mutation_rate = 2.0;
        assert!(optimize(&[], &stocks, &settings).is_err());
    }

    #[test]
    fn test_unplaced_grouping_preserves_quantity() {
        let parts = vec![Part::new("Huge", 5000.0, 5000.0, 3)];
        let stocks = vec![StockSheet::new("Small", 100.0, 100.0, 2)];
        let result = optimize(&parts, &stocks, &CutSettings::default()).unwrap();

        assert_eq!(result.sheets_used(), 0);
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.unplaced[0].quantity, 3);
        assert_eq!(result.unplaced[0].label, "Huge");
    }
}
