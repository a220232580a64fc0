//! # SlabCut Importer
//!
//! File importers that turn external data into [`slabcut_model::Part`]s:
//! CSV part lists, CSV library catalogues, and DXF drawings. Importers never
//! abort on a bad row; they collect row-located errors and warnings in an
//! [`ImportReport`] alongside whatever parsed cleanly.

mod csv_import;
mod dxf;

pub use csv_import::{import_library_csv, import_parts_csv, LibraryImportReport};
pub use dxf::{import_dxf, import_dxf_with_options};

use slabcut_model::Part;

/// The outcome of an import: parsed parts plus everything that went wrong.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub parts: Vec<Part>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
