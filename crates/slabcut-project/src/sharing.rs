//! Shared-project export and import.
//!
//! A shared file wraps the project in an envelope carrying sharing metadata,
//! so recipients can tell shared files apart from regular saves. Import
//! accepts both the wrapped and the plain form.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use slabcut_model::{Project, Result};

/// File format for shared projects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedProject {
    pub format_version: String,
    /// RFC3339 UTC timestamp of the export.
    pub shared_at: String,
    pub shared_by: String,
    pub project: Project,
}

/// Exports a project as a shareable file, stamping the author and notes into
/// the project metadata. Parent directories are created as needed.
pub fn export_shared(
    path: impl AsRef<Path>,
    mut project: Project,
    author: &str,
    notes: &str,
) -> Result<()> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    project.metadata.updated_at = now.clone();
    if project.metadata.created_at.is_empty() {
        project.metadata.created_at = now.clone();
    }
    project.metadata.author = author.to_string();
    project.metadata.notes = notes.to_string();
    project.metadata.version = "1.0".to_string();

    let shared = SharedProject {
        format_version: "1.0".to_string(),
        shared_at: now,
        shared_by: author.to_string(),
        project,
    };

    let data = serde_json::to_string_pretty(&shared)?;
    if let Some(dir) = path.as_ref().parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

/// Imports a shared project file. Falls back to the plain project format for
/// files saved without the sharing envelope. When reading the wrapped form,
/// `shared_by` backfills `metadata.shared_from` if it is empty.
pub fn import_shared(path: impl AsRef<Path>) -> Result<Project> {
    let data = std::fs::read_to_string(path)?;

    if let Ok(shared) = serde_json::from_str::<SharedProject>(&data) {
        if !shared.format_version.is_empty() {
            let mut project = shared.project;
            if project.metadata.shared_from.is_empty() {
                project.metadata.shared_from = shared.shared_by;
            }
            return Ok(project);
        }
    }

    let project: Project = serde_json::from_str(&data)?;
    Ok(project)
}
