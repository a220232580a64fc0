//! # SlabCut Model
//!
//! Core data model for the SlabCut sheet-cutting optimizer: geometry
//! primitives, parts and stock sheets, cut settings, optimization results,
//! the parts library, and the persisted project shape.
//!
//! All linear dimensions are millimetres; all coordinates are
//! double-precision with a 1e-6 fit tolerance.

pub mod edgebanding;
pub mod error;
pub mod geometry;
pub mod library;
pub mod part;
pub mod placement;
pub mod project;
pub mod settings;

// Re-exports
pub use edgebanding::{calculate_edge_banding, per_part_edge_banding, EdgeBandingLine, EdgeBandingSummary};
pub use error::{Error, Result};
pub use geometry::{Outline, Point2D, Rect, EPSILON};
pub use library::{LibraryPart, PartsLibrary};
pub use part::{EdgeBanding, Grain, Part, StockSheet};
pub use placement::{OptimizeResult, Placement, SheetResult};
pub use project::{Project, ProjectMetadata};
pub use settings::{Algorithm, CutSettings, GCodeDialect};
