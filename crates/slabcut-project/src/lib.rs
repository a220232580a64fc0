//! # SlabCut Project
//!
//! Persistence for projects, shared-project files, GCode exports, and the
//! personal parts library. Everything is plain JSON on disk; unknown fields
//! are ignored on load so newer files open in older builds.

mod library_store;
mod sharing;

pub use library_store::{
    default_library_path, load_default_library, load_library, save_default_library, save_library,
};
pub use sharing::{export_shared, import_shared, SharedProject};

use std::path::Path;

use slabcut_model::{Project, Result};

/// Saves a project as pretty JSON.
pub fn save(path: impl AsRef<Path>, project: &Project) -> Result<()> {
    let data = serde_json::to_string_pretty(project)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Loads a project from a JSON file.
pub fn load(path: impl AsRef<Path>) -> Result<Project> {
    let data = std::fs::read_to_string(path)?;
    let project = serde_json::from_str(&data)?;
    Ok(project)
}

/// Writes a generated GCode program to a file.
pub fn export_gcode(path: impl AsRef<Path>, code: &str) -> Result<()> {
    std::fs::write(path, code)?;
    Ok(())
}
