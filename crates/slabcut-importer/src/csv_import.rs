//! CSV importers for part lists and library catalogues.

use std::path::Path;

use csv::ReaderBuilder;

use slabcut_model::{Grain, LibraryPart, Part};

use crate::ImportReport;

/// Imports parts from a CSV file with columns
/// `label,width,height,quantity[,grain]`.
///
/// A header row is detected by the second column failing to parse as a
/// number and is skipped with a warning. Bad rows become error entries and
/// the import continues.
pub fn import_parts_csv(path: impl AsRef<Path>) -> ImportReport {
    let mut report = ImportReport::default();

    let mut reader = match ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())
    {
        Ok(reader) => reader,
        Err(err) => {
            report.errors.push(format!("Cannot open file: {}", err));
            return report;
        }
    };

    let records: Vec<csv::StringRecord> = match reader.records().collect() {
        Ok(records) => records,
        Err(err) => {
            report.errors.push(format!("Cannot read CSV: {}", err));
            return report;
        }
    };

    if records.is_empty() {
        report.errors.push("File is empty".to_string());
        return report;
    }

    let mut start_row = 0;
    if records[0].len() >= 3 && records[0].get(1).and_then(parse_number).is_none() {
        start_row = 1;
        report
            .warnings
            .push("Detected header row, skipping".to_string());
    }

    for (i, row) in records.iter().enumerate().skip(start_row) {
        let line = i + 1;

        if row.is_empty() || (row.len() == 1 && row.get(0) == Some("")) {
            continue;
        }
        if row.len() < 4 {
            report.errors.push(format!(
                "Line {}: Not enough columns (need at least: Label, Width, Height, Quantity)",
                line
            ));
            continue;
        }

        let label = match row.get(0) {
            Some("") | None => format!("Part {}", report.parts.len() + 1),
            Some(label) => label.to_string(),
        };

        let width = match row.get(1).and_then(parse_number) {
            Some(w) => w,
            None => {
                report.errors.push(format!(
                    "Line {}: Invalid width {:?}",
                    line,
                    row.get(1).unwrap_or("")
                ));
                continue;
            }
        };
        let height = match row.get(2).and_then(parse_number) {
            Some(h) => h,
            None => {
                report.errors.push(format!(
                    "Line {}: Invalid height {:?}",
                    line,
                    row.get(2).unwrap_or("")
                ));
                continue;
            }
        };
        let quantity = match row.get(3).map(str::trim).and_then(|q| q.parse::<i64>().ok()) {
            Some(q) => q,
            None => {
                report.errors.push(format!(
                    "Line {}: Invalid quantity {:?}",
                    line,
                    row.get(3).unwrap_or("")
                ));
                continue;
            }
        };

        if width <= 0.0 || height <= 0.0 || quantity <= 0 {
            report.errors.push(format!(
                "Line {}: Width, height, and quantity must be positive",
                line
            ));
            continue;
        }

        let mut part = Part::new(label, width, height, quantity as u32);
        if let Some(grain_str) = row.get(4) {
            match parse_grain(grain_str) {
                Some(grain) => part.grain = grain,
                None => {
                    log::warn!("line {}: unknown grain direction {:?}", line, grain_str);
                    report.warnings.push(format!(
                        "Line {}: Unknown grain direction {:?}, defaulting to None",
                        line, grain_str
                    ));
                }
            }
        }

        report.parts.push(part);
    }

    report
}

/// Library-catalogue import outcome.
#[derive(Debug, Clone, Default)]
pub struct LibraryImportReport {
    pub parts: Vec<LibraryPart>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Imports library parts from a header-driven CSV file.
///
/// Required columns: `label`, `width`, `height`. Optional: `grain`,
/// `category`, `material`, `thickness`, `notes`, `tags`
/// (semicolon-separated). Column names are case-insensitive.
pub fn import_library_csv(path: impl AsRef<Path>) -> LibraryImportReport {
    let mut report = LibraryImportReport::default();

    let mut reader = match ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())
    {
        Ok(reader) => reader,
        Err(err) => {
            report.errors.push(format!("Cannot open file: {}", err));
            return report;
        }
    };

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            report.errors.push(format!("Cannot read CSV header: {}", err));
            return report;
        }
    };
    let column = |name: &str| -> Option<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let (label_col, width_col, height_col) = match (column("label"), column("width"), column("height"))
    {
        (Some(l), Some(w), Some(h)) => (l, w, h),
        _ => {
            report
                .errors
                .push("Missing required columns: label, width, height".to_string());
            return report;
        }
    };
    let grain_col = column("grain");
    let category_col = column("category");
    let material_col = column("material");
    let thickness_col = column("thickness");
    let notes_col = column("notes");
    let tags_col = column("tags");

    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // 1-based, after the header row
        let row = match record {
            Ok(row) => row,
            Err(err) => {
                report.errors.push(format!("Line {}: {}", line, err));
                continue;
            }
        };

        let label = row.get(label_col).unwrap_or("").trim().to_string();
        if label.is_empty() {
            report.errors.push(format!("Line {}: Missing label", line));
            continue;
        }

        let width = row.get(width_col).and_then(parse_number);
        let height = row.get(height_col).and_then(parse_number);
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => (w, h),
            _ => {
                report.errors.push(format!(
                    "Line {}: Width and height must be positive numbers",
                    line
                ));
                continue;
            }
        };

        let grain = grain_col
            .and_then(|c| row.get(c))
            .and_then(|g| {
                let parsed = parse_grain(g);
                if parsed.is_none() {
                    report.warnings.push(format!(
                        "Line {}: Unknown grain direction {:?}, defaulting to None",
                        line, g
                    ));
                }
                parsed
            })
            .unwrap_or(Grain::None);

        let mut part = LibraryPart::new(label, width, height, grain);
        if let Some(category) = category_col.and_then(|c| row.get(c)) {
            part.category = category.trim().to_string();
        }
        if let Some(material) = material_col.and_then(|c| row.get(c)) {
            part.material = material.trim().to_string();
        }
        if let Some(thickness) = thickness_col.and_then(|c| row.get(c)).and_then(parse_number) {
            part.thickness = thickness;
        }
        if let Some(notes) = notes_col.and_then(|c| row.get(c)) {
            part.notes = notes.trim().to_string();
        }
        if let Some(tags) = tags_col.and_then(|c| row.get(c)) {
            part.tags = tags
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        report.parts.push(part);
    }

    report
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

fn parse_grain(field: &str) -> Option<Grain> {
    match field.trim() {
        "Horizontal" | "H" | "h" => Some(Grain::Horizontal),
        "Vertical" | "V" | "v" => Some(Grain::Vertical),
        "" | "None" | "N" | "n" => Some(Grain::None),
        _ => None,
    }
}
