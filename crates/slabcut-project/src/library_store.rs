//! Parts-library persistence.
//!
//! The library lives in a single JSON file under `~/.slabcut/`. A missing
//! file is not an error: loading it yields a fresh empty library.

use std::path::{Path, PathBuf};

use slabcut_model::{Error, PartsLibrary, Result};

/// Default location of the parts library, `$HOME/.slabcut/parts_library.json`.
/// The directory is created on demand.
pub fn default_library_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::InvalidInput("cannot determine home directory".into()))?;
    let dir = home.join(".slabcut");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("parts_library.json"))
}

/// Saves a parts library as pretty JSON.
pub fn save_library(path: impl AsRef<Path>, library: &PartsLibrary) -> Result<()> {
    let data = serde_json::to_string_pretty(library)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Loads a parts library. An absent file yields a new empty library; a
/// present file gets missing sections backfilled.
pub fn load_library(path: impl AsRef<Path>) -> Result<PartsLibrary> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("parts library not found, starting with an empty one");
            return Ok(PartsLibrary::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut library: PartsLibrary = serde_json::from_str(&data)?;
    if library.categories.is_empty() {
        library.categories = vec!["General".to_string()];
    }
    Ok(library)
}

/// Loads the library from the default path.
pub fn load_default_library() -> Result<PartsLibrary> {
    load_library(default_library_path()?)
}

/// Saves the library to the default path.
pub fn save_default_library(library: &PartsLibrary) -> Result<()> {
    save_library(default_library_path()?, library)
}
