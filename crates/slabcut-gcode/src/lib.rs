//! # SlabCut GCode
//!
//! Converts an optimized sheet layout into machine-ready GCode: tool-radius
//! offset perimeters, multi-pass depth stepping, optional holding tabs, and
//! dialect-specific framing via [`GCodeProfile`] tables.
//!
//! ```no_run
//! use slabcut_gcode::Generator;
//! use slabcut_model::CutSettings;
//!
//! # let result = slabcut_model::OptimizeResult::new();
//! let generator = Generator::new(CutSettings::default());
//! for (i, program) in generator.generate_all(&result).iter().enumerate() {
//!     std::fs::write(format!("sheet_{}.nc", i + 1), program).unwrap();
//! }
//! ```

mod generator;
mod profile;

pub use generator::Generator;
pub use profile::GCodeProfile;
