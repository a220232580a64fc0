//! # SlabCut Engine
//!
//! The packing engine: a guillotine shelf heuristic, a genetic search that
//! decodes through it, the multi-sheet optimize driver, and a parallel
//! scenario comparator.
//!
//! ```no_run
//! use slabcut_engine::optimize;
//! use slabcut_model::{CutSettings, Part, StockSheet};
//!
//! let parts = vec![Part::new("Shelf", 800.0, 300.0, 4)];
//! let stocks = vec![StockSheet::new("MDF", 2440.0, 1220.0, 2)];
//! let result = optimize(&parts, &stocks, &CutSettings::default()).unwrap();
//! println!("{} sheets, {:.1}% waste", result.sheets_used(), result.waste_percent());
//! ```

mod compare;
mod genetic;
mod guillotine;
mod optimizer;

pub use compare::{
    best_scenario_index, build_default_scenarios, compare_scenarios, ComparisonResult,
    ComparisonScenario,
};
pub use genetic::GeneticRun;
pub use optimizer::optimize;

use slabcut_model::{CutSettings, Part, Result, StockSheet};

/// Runs the genetic search directly, returning the fitness trace alongside
/// the layout. [`optimize`] with [`slabcut_model::Algorithm::Genetic`] is the
/// usual entry point; this variant exists for analysis and tests.
pub fn run_genetic(
    parts: &[Part],
    stocks: &[StockSheet],
    settings: &CutSettings,
) -> Result<GeneticRun> {
    settings.validate()?;
    for part in parts {
        part.validate()?;
    }
    for stock in stocks {
        stock.validate()?;
    }
    let units = optimizer::expand_parts(parts);
    let queue = optimizer::expand_stocks(stocks);
    Ok(genetic::run(&units, &queue, settings))
}
