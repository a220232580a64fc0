//! Cut settings: packer tuning, GCode machine parameters, GA hyperparameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Packing algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Shelf-based first-fit-decreasing heuristic (fast).
    #[default]
    Guillotine,
    /// Genetic search over placement order and rotations (slower, tighter).
    Genetic,
}

/// GCode dialect selector.
///
/// `Unknown` absorbs unrecognized profile names found in project files;
/// the generator falls back to the Generic profile and emits a warning in
/// the output header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GCodeDialect {
    #[default]
    Generic,
    Mach3,
    #[serde(rename = "LinuxCNC")]
    LinuxCnc,
    Grbl,
    Fanuc,
    Unknown,
}

impl<'de> Deserialize<'de> for GCodeDialect {
    /// Unrecognized names deserialize to `Unknown` instead of failing, so a
    /// project saved by a newer build still loads.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "Generic" => GCodeDialect::Generic,
            "Mach3" => GCodeDialect::Mach3,
            "LinuxCNC" => GCodeDialect::LinuxCnc,
            "Grbl" => GCodeDialect::Grbl,
            "Fanuc" => GCodeDialect::Fanuc,
            _ => GCodeDialect::Unknown,
        })
    }
}

/// All tunable parameters for packing and toolpath generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutSettings {
    pub algorithm: Algorithm,

    /// Material removed by each cut, in mm. Parts are spaced by this amount.
    pub kerf_width: f64,
    /// Margin trimmed from every outer edge of the stock before packing, mm.
    pub edge_trim: f64,
    /// Whether the packer may rotate grain-free parts by 90 degrees.
    pub allow_rotation: bool,
    /// Whether grain directions forbid rotation.
    pub respect_grain: bool,

    pub gcode_profile: GCodeDialect,
    /// Cutter diameter in mm.
    pub tool_diameter: f64,
    /// XY feed rate, mm/min.
    pub feed_rate: f64,
    /// Z plunge rate, mm/min.
    pub plunge_rate: f64,
    /// Spindle speed, RPM.
    pub spindle_speed: f64,
    /// Retract height above the stock, mm.
    pub safe_z: f64,
    /// Total cut depth, mm.
    pub cut_depth: f64,
    /// Maximum depth per pass, mm.
    pub pass_depth: f64,

    /// Holding tabs per side; 0 disables tabs.
    pub part_tabs_per_side: u32,
    /// Tab width along the cut, mm.
    pub part_tab_width: f64,
    /// Material thickness left under each tab, mm.
    pub part_tab_height: f64,

    // Genetic algorithm hyperparameters.
    pub population_size: usize,
    pub generations: u32,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_count: usize,
    /// Seed for the genetic search; identical inputs and seed reproduce
    /// identical results.
    pub random_seed: u64,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Guillotine,
            kerf_width: 3.0,
            edge_trim: 10.0,
            allow_rotation: true,
            respect_grain: true,
            gcode_profile: GCodeDialect::Generic,
            tool_diameter: 6.0,
            feed_rate: 1000.0,
            plunge_rate: 300.0,
            spindle_speed: 18000.0,
            safe_z: 5.0,
            cut_depth: 18.0,
            pass_depth: 6.0,
            part_tabs_per_side: 0,
            part_tab_width: 8.0,
            part_tab_height: 3.0,
            population_size: 80,
            generations: 150,
            mutation_rate: 0.1,
            crossover_rate: 0.85,
            elite_count: 3,
            random_seed: 42,
        }
    }
}

impl CutSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the kerf width in mm.
    pub fn with_kerf_width(mut self, kerf: f64) -> Self {
        self.kerf_width = kerf;
        self
    }

    /// Sets the edge trim in mm.
    pub fn with_edge_trim(mut self, trim: f64) -> Self {
        self.edge_trim = trim;
        self
    }

    /// Sets the GA seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Validates every range constraint.
    pub fn validate(&self) -> Result<()> {
        if self.kerf_width < 0.0 {
            return Err(Error::InvalidInput("kerf_width must be >= 0".into()));
        }
        if self.edge_trim < 0.0 {
            return Err(Error::InvalidInput("edge_trim must be >= 0".into()));
        }
        for (name, value) in [
            ("tool_diameter", self.tool_diameter),
            ("feed_rate", self.feed_rate),
            ("plunge_rate", self.plunge_rate),
            ("spindle_speed", self.spindle_speed),
            ("safe_z", self.safe_z),
            ("cut_depth", self.cut_depth),
            ("pass_depth", self.pass_depth),
        ] {
            if !(value > 0.0) {
                return Err(Error::InvalidInput(format!("{} must be > 0", name)));
            }
        }
        if self.part_tabs_per_side > 0 {
            if !(self.part_tab_width > 0.0) {
                return Err(Error::InvalidInput("part_tab_width must be > 0".into()));
            }
            if !(self.part_tab_height > 0.0) {
                return Err(Error::InvalidInput("part_tab_height must be > 0".into()));
            }
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidInput("mutation_rate must be in [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::InvalidInput(
                "crossover_rate must be in [0, 1]".into(),
            ));
        }
        if self.population_size < 2 {
            return Err(Error::InvalidInput("population_size must be >= 2".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CutSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut s = CutSettings::default();
        s.kerf_width = -1.0;
        assert!(s.validate().is_err());

        let mut s = CutSettings::default();
        s.pass_depth = 0.0;
        assert!(s.validate().is_err());

        let mut s = CutSettings::default();
        s.mutation_rate = 1.5;
        assert!(s.validate().is_err());

        let mut s = CutSettings::default();
        s.part_tabs_per_side = 2;
        s.part_tab_height = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_unknown_profile_deserializes() {
        let dialect: GCodeDialect = serde_json::from_str("\"Marlin\"").unwrap();
        assert_eq!(dialect, GCodeDialect::Unknown);

        let dialect: GCodeDialect = serde_json::from_str("\"LinuxCNC\"").unwrap();
        assert_eq!(dialect, GCodeDialect::LinuxCnc);
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = CutSettings::default()
            .with_algorithm(Algorithm::Genetic)
            .with_kerf_width(2.5)
            .with_seed(7);
        let json = serde_json::to_string(&settings).unwrap();
        let back: CutSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: CutSettings = serde_json::from_str("{\"kerf_width\": 2.0}").unwrap();
        assert_eq!(settings.kerf_width, 2.0);
        assert_eq!(settings.edge_trim, CutSettings::default().edge_trim);
        assert_eq!(settings.random_seed, 42);
    }
}
