//! Scenario comparator: runs the optimizer across parameter variations in
//! parallel and ranks the outcomes.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use slabcut_model::{Algorithm, CutSettings, OptimizeResult, Part, StockSheet};

use crate::optimizer::optimize;

/// A named settings variation to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonScenario {
    pub name: String,
    pub settings: CutSettings,
}

impl ComparisonScenario {
    pub fn new(name: impl Into<String>, settings: CutSettings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }
}

/// The outcome of one scenario, with the headline numbers pre-computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub scenario: ComparisonScenario,
    pub result: OptimizeResult,
    pub sheets_used: usize,
    pub total_cuts: usize,
    pub waste_percent: f64,
    pub unplaced_count: u32,
    /// Set when the scenario failed instead of producing a layout.
    pub error: Option<String>,
}

impl ComparisonResult {
    fn from_result(scenario: ComparisonScenario, result: OptimizeResult) -> Self {
        Self {
            sheets_used: result.sheets_used(),
            total_cuts: result.total_cuts(),
            waste_percent: result.waste_percent(),
            unplaced_count: result.unplaced_count(),
            scenario,
            result,
            error: None,
        }
    }

    /// A failed scenario counts every part as unplaced with 100% waste so
    /// ranking pushes it to the bottom.
    fn from_error(scenario: ComparisonScenario, parts: &[Part], message: String) -> Self {
        let result = OptimizeResult {
            sheets: Vec::new(),
            unplaced: parts.to_vec(),
        };
        Self {
            sheets_used: 0,
            total_cuts: 0,
            waste_percent: 100.0,
            unplaced_count: result.unplaced_count(),
            scenario,
            result,
            error: Some(message),
        }
    }
}

/// Runs every scenario on a worker pool; results come back in input order.
/// A scenario that errors or panics fills its slot with an error-bearing
/// result and does not disturb the others.
pub fn compare_scenarios(
    scenarios: &[ComparisonScenario],
    parts: &[Part],
    stocks: &[StockSheet],
) -> Vec<ComparisonResult> {
    scenarios
        .par_iter()
        .map(|scenario| {
            let run = catch_unwind(AssertUnwindSafe(|| {
                optimize(parts, stocks, &scenario.settings)
            }));
            match run {
                Ok(Ok(result)) => ComparisonResult::from_result(scenario.clone(), result),
                Ok(Err(err)) => {
                    log::warn!("scenario {:?} failed: {}", scenario.name, err);
                    ComparisonResult::from_error(scenario.clone(), parts, err.to_string())
                }
                Err(_) => {
                    log::warn!("scenario {:?} panicked", scenario.name);
                    ComparisonResult::from_error(
                        scenario.clone(),
                        parts,
                        "optimizer panicked".to_string(),
                    )
                }
            }
        })
        .collect()
}

/// Builds the standard sweep around a base setting: the base itself, the
/// other algorithm, halved and 1.5x kerf, no/doubled edge trim, and (when
/// the base rotates) a rotation-disabled variant.
pub fn build_default_scenarios(base: &CutSettings) -> Vec<ComparisonScenario> {
    let mut scenarios = vec![ComparisonScenario::new("Current Settings", base.clone())];

    match base.algorithm {
        Algorithm::Guillotine => {
            let mut s = base.clone();
            s.algorithm = Algorithm::Genetic;
            scenarios.push(ComparisonScenario::new("Genetic Algorithm", s));
        }
        Algorithm::Genetic => {
            let mut s = base.clone();
            s.algorithm = Algorithm::Guillotine;
            scenarios.push(ComparisonScenario::new("Guillotine Algorithm", s));
        }
    }

    let mut s = base.clone();
    s.kerf_width = base.kerf_width * 0.5;
    scenarios.push(ComparisonScenario::new("Kerf x0.5", s));

    let mut s = base.clone();
    s.kerf_width = base.kerf_width * 1.5;
    scenarios.push(ComparisonScenario::new("Kerf x1.5", s));

    let mut s = base.clone();
    s.edge_trim = 0.0;
    scenarios.push(ComparisonScenario::new("No Edge Trim", s));

    let mut s = base.clone();
    s.edge_trim = base.edge_trim * 2.0;
    scenarios.push(ComparisonScenario::new("Edge Trim x2", s));

    if base.allow_rotation {
        let mut s = base.clone();
        s.allow_rotation = false;
        scenarios.push(ComparisonScenario::new("Rotation Disabled", s));
    }

    scenarios
}

/// Index of the best result: lowest waste among scenarios that placed
/// everything; if none did, lowest unplaced count, then lowest waste.
pub fn best_scenario_index(results: &[ComparisonResult]) -> Option<usize> {
    if results.is_empty() {
        return None;
    }

    let complete = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.unplaced_count == 0)
        .min_by(|(_, a), (_, b)| {
            a.waste_percent
                .partial_cmp(&b.waste_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some((idx, _)) = complete {
        return Some(idx);
    }

    results
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.unplaced_count.cmp(&b.unplaced_count).then(
                a.waste_percent
                    .partial_cmp(&b.waste_percent)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        })
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios_guillotine_base() {
        let base = CutSettings::default();
        let scenarios = build_default_scenarios(&base);

        assert!(scenarios.len() >= 2);
        assert_eq!(scenarios[0].name, "Current Settings");

        let genetic = scenarios
            .iter()
            .find(|s| s.name == "Genetic Algorithm")
            .expect("expected a Genetic Algorithm scenario");
        assert_eq!(genetic.settings.algorithm, Algorithm::Genetic);

        assert!(scenarios.iter().any(|s| s.name == "Rotation Disabled"));
    }

    #[test]
    fn test_default_scenarios_genetic_base() {
        let base = CutSettings::default().with_algorithm(Algorithm::Genetic);
        let scenarios = build_default_scenarios(&base);
        assert!(scenarios.iter().any(|s| s.name == "Guillotine Algorithm"));
    }

    #[test]
    fn test_kerf_and_trim_variants() {
        let mut base = CutSettings::default();
        base.kerf_width = 4.0;
        base.edge_trim = 10.0;
        let scenarios = build_default_scenarios(&base);

        let half = scenarios.iter().find(|s| s.name == "Kerf x0.5").unwrap();
        assert_eq!(half.settings.kerf_width, 2.0);

        let no_trim = scenarios.iter().find(|s| s.name == "No Edge Trim").unwrap();
        assert_eq!(no_trim.settings.edge_trim, 0.0);

        let double = scenarios.iter().find(|s| s.name == "Edge Trim x2").unwrap();
        assert_eq!(double.settings.edge_trim, 20.0);
    }

    #[test]
    fn test_best_prefers_complete_layouts() {
        let base = CutSettings::default();
        let mk = |unplaced: u32, waste: f64| ComparisonResult {
            scenario: ComparisonScenario::new("s", base.clone()),
            result: OptimizeResult::new(),
            sheets_used: 1,
            total_cuts: 1,
            waste_percent: waste,
            unplaced_count: unplaced,
            error: None,
        };

        // Complete at 30% waste beats incomplete at 10%.
        let results = vec![mk(0, 30.0), mk(2, 10.0)];
        assert_eq!(best_scenario_index(&results), Some(0));

        // With nothing complete, fewest unplaced wins.
        let results = vec![mk(3, 10.0), mk(1, 50.0), mk(1, 40.0)];
        assert_eq!(best_scenario_index(&results), Some(2));

        assert_eq!(best_scenario_index(&[]), None);
    }
}
