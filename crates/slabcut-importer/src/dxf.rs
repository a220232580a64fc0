//! DXF outline import.
//!
//! A minimal reader over the DXF group-code/value pair stream, limited to
//! the ENTITIES section. Supported entities:
//!
//! - `LWPOLYLINE`: taken as a closed polygon
//! - `CIRCLE`: approximated as a 64-segment polygon
//! - `LINE`: segments chained into loops when endpoints meet within 0.01 mm
//!
//! Each closed outline becomes one part whose dimensions are its bounding
//! box; the outline itself is kept, translated to the origin.

use std::path::Path;

use slabcut_model::{Outline, Part, Point2D};

use crate::ImportReport;

/// Endpoint tolerance for chaining LINE segments, mm.
const CHAIN_TOLERANCE: f64 = 0.01;

/// Segment count used to approximate circles.
const CIRCLE_SEGMENTS: usize = 64;

/// Loops smaller than this are treated as drawing noise, mm².
const DEFAULT_MIN_AREA: f64 = 100.0;

/// Imports closed outlines from a DXF file with the default area threshold.
pub fn import_dxf(path: impl AsRef<Path>) -> ImportReport {
    import_dxf_with_options(path, DEFAULT_MIN_AREA)
}

/// Imports closed outlines from a DXF file, discarding loops smaller than
/// `min_area` (mm²).
pub fn import_dxf_with_options(path: impl AsRef<Path>, min_area: f64) -> ImportReport {
    let mut report = ImportReport::default();

    let content = match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(err) => {
            report.errors.push(format!("Cannot open file: {}", err));
            return report;
        }
    };
    if content.trim().is_empty() {
        report.errors.push("DXF file is empty".to_string());
        return report;
    }

    let entities = parse_entities(&content);
    if entities.is_empty() {
        report
            .errors
            .push("No supported entities found in DXF file".to_string());
        return report;
    }

    let mut outlines: Vec<Outline> = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();

    for entity in entities {
        match entity {
            Entity::Polyline(points) => {
                if points.len() >= 3 {
                    outlines.push(Outline::new(points));
                } else {
                    report
                        .warnings
                        .push("Skipping LWPOLYLINE with fewer than 3 vertices".to_string());
                }
            }
            Entity::Circle { cx, cy, r } => {
                if r > 0.0 {
                    outlines.push(circle_outline(cx, cy, r));
                } else {
                    report.warnings.push("Skipping zero-radius CIRCLE".to_string());
                }
            }
            Entity::Line { x1, y1, x2, y2 } => segments.push(Segment {
                start: Point2D::new(x1, y1),
                end: Point2D::new(x2, y2),
            }),
        }
    }

    let (loops, open_chains) = chain_segments(&segments, CHAIN_TOLERANCE);
    if open_chains > 0 {
        report.warnings.push(format!(
            "{} open LINE chain(s) did not close into a loop",
            open_chains
        ));
    }
    outlines.extend(loops);

    for outline in outlines {
        let area = outline.area();
        if area < min_area {
            log::warn!("discarding outline with area {:.2} mm2", area);
            report.warnings.push(format!(
                "Discarding outline with area {:.2} mm2 (below threshold {:.2})",
                area, min_area
            ));
            continue;
        }

        let normalized = outline.normalize();
        let (_, max) = normalized.bounding_box();
        let mut part = Part::new(
            format!("DXF Part {}", report.parts.len() + 1),
            max.x,
            max.y,
            1,
        );
        part.outline = Some(normalized);
        report.parts.push(part);
    }

    if report.parts.is_empty() && report.errors.is_empty() {
        report
            .warnings
            .push("No closed outlines above the area threshold".to_string());
    }

    report
}

enum Entity {
    Polyline(Vec<Point2D>),
    Circle { cx: f64, cy: f64, r: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

struct Segment {
    start: Point2D,
    end: Point2D,
}

/// Walks the (code, value) pair stream and collects supported entities from
/// the ENTITIES section.
fn parse_entities(content: &str) -> Vec<Entity> {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let mut entities = Vec::new();

    let mut in_entities = false;
    let mut current: Option<RawEntity> = None;

    let mut i = 0;
    while i + 1 < lines.len() {
        let code: i32 = match lines[i].parse() {
            Ok(code) => code,
            Err(_) => {
                i += 2;
                continue;
            }
        };
        let value = lines[i + 1];
        i += 2;

        if code == 0 && value == "SECTION" {
            // Peek at the section name pair.
            if i + 1 < lines.len() && lines[i] == "2" {
                in_entities = lines[i + 1] == "ENTITIES";
            }
            continue;
        }
        if code == 0 && value == "ENDSEC" {
            if let Some(raw) = current.take() {
                entities.extend(raw.finish());
            }
            in_entities = false;
            continue;
        }
        if !in_entities {
            continue;
        }

        if code == 0 {
            if let Some(raw) = current.take() {
                entities.extend(raw.finish());
            }
            current = match value {
                "LWPOLYLINE" => Some(RawEntity::polyline()),
                "CIRCLE" => Some(RawEntity::circle()),
                "LINE" => Some(RawEntity::line()),
                _ => None,
            };
            continue;
        }

        if let Some(raw) = current.as_mut() {
            if let Ok(number) = value.parse::<f64>() {
                raw.field(code, number);
            }
        }
    }

    if let Some(raw) = current.take() {
        entities.extend(raw.finish());
    }
    entities
}

/// Accumulates group-code fields until the next entity begins.
enum RawEntity {
    Polyline { xs: Vec<f64>, ys: Vec<f64> },
    Circle { cx: f64, cy: f64, r: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl RawEntity {
    fn polyline() -> Self {
        RawEntity::Polyline {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    fn circle() -> Self {
        RawEntity::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 0.0,
        }
    }

    fn line() -> Self {
        RawEntity::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        }
    }

    fn field(&mut self, code: i32, value: f64) {
        match self {
            RawEntity::Polyline { xs, ys } => match code {
                10 => xs.push(value),
                20 => ys.push(value),
                _ => {}
            },
            RawEntity::Circle { cx, cy, r } => match code {
                10 => *cx = value,
                20 => *cy = value,
                40 => *r = value,
                _ => {}
            },
            RawEntity::Line { x1, y1, x2, y2 } => match code {
                10 => *x1 = value,
                20 => *y1 = value,
                11 => *x2 = value,
                21 => *y2 = value,
                _ => {}
            },
        }
    }

    fn finish(self) -> Option<Entity> {
        match self {
            RawEntity::Polyline { xs, ys } => {
                let points: Vec<Point2D> = xs
                    .iter()
                    .zip(&ys)
                    .map(|(&x, &y)| Point2D::new(x, y))
                    .collect();
                Some(Entity::Polyline(points))
            }
            RawEntity::Circle { cx, cy, r } => Some(Entity::Circle { cx, cy, r }),
            RawEntity::Line { x1, y1, x2, y2 } => Some(Entity::Line { x1, y1, x2, y2 }),
        }
    }
}

fn circle_outline(cx: f64, cy: f64, r: f64) -> Outline {
    let points = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / CIRCLE_SEGMENTS as f64;
            Point2D::new(cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect();
    Outline::new(points)
}

/// Chains LINE segments into closed loops. Endpoints within `tolerance`
/// of each other are considered joined. Returns the closed loops and the
/// number of chains that never closed.
fn chain_segments(segments: &[Segment], tolerance: f64) -> (Vec<Outline>, usize) {
    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();
    let mut open_chains = 0;

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let head = segments[start].start;
        let mut points = vec![segments[start].start, segments[start].end];
        let mut tail = segments[start].end;
        let mut closed = false;

        loop {
            if tail.distance(&head) <= tolerance && points.len() >= 3 {
                // The last point duplicates the head; drop it.
                points.pop();
                closed = true;
                break;
            }

            let next = segments.iter().enumerate().find(|(j, seg)| {
                !used[*j]
                    && (seg.start.distance(&tail) <= tolerance
                        || seg.end.distance(&tail) <= tolerance)
            });
            match next {
                Some((j, seg)) => {
                    used[j] = true;
                    tail = if seg.start.distance(&tail) <= tolerance {
                        seg.end
                    } else {
                        seg.start
                    };
                    points.push(tail);
                }
                None => break,
            }
        }

        if closed {
            loops.push(Outline::new(points));
        } else {
            open_chains += 1;
        }
    }

    (loops, open_chains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dxf_file(pairs: &[(i32, &str)]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for (code, value) in pairs {
            writeln!(file, "{}", code).unwrap();
            writeln!(file, "{}", value).unwrap();
        }
        file
    }

    /// Wraps entity pairs in a SECTION/ENTITIES envelope.
    fn entities_section<'a>(body: &[(i32, &'a str)]) -> Vec<(i32, &'a str)> {
        let mut pairs = vec![(0, "SECTION"), (2, "ENTITIES")];
        pairs.extend_from_slice(body);
        pairs.push((0, "ENDSEC"));
        pairs.push((0, "EOF"));
        pairs
    }

    #[test]
    fn test_rectangle_lwpolyline() {
        let body = [
            (0, "LWPOLYLINE"),
            (90, "4"),
            (70, "1"),
            (10, "0"),
            (20, "0"),
            (10, "200"),
            (20, "0"),
            (10, "200"),
            (20, "100"),
            (10, "0"),
            (20, "100"),
        ];
        let file = dxf_file(&entities_section(&body));
        let report = import_dxf(file.path());

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.parts.len(), 1);

        let part = &report.parts[0];
        assert!((part.width - 200.0).abs() < 0.1);
        assert!((part.height - 100.0).abs() < 0.1);
        assert_eq!(part.quantity, 1);
        let outline = part.outline.as_ref().unwrap();
        assert!(outline.len() >= 4);
    }

    #[test]
    fn test_circle_becomes_64_segment_polygon() {
        let body = [
            (0, "CIRCLE"),
            (10, "50"),
            (20, "50"),
            (40, "25"),
        ];
        let file = dxf_file(&entities_section(&body));
        let report = import_dxf(file.path());

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.parts.len(), 1);

        let part = &report.parts[0];
        assert!((part.width - 50.0).abs() < 0.5);
        assert!((part.height - 50.0).abs() < 0.5);
        assert_eq!(part.outline.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_triangle_from_chained_lines() {
        let body = [
            (0, "LINE"),
            (10, "0"),
            (20, "0"),
            (11, "100"),
            (21, "0"),
            (0, "LINE"),
            (10, "100"),
            (20, "0"),
            (11, "50"),
            (21, "86.6"),
            (0, "LINE"),
            (10, "50"),
            (20, "86.6"),
            (11, "0"),
            (21, "0"),
        ];
        let file = dxf_file(&entities_section(&body));
        let report = import_dxf(file.path());

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.parts.len(), 1);
        let part = &report.parts[0];
        assert!((part.width - 100.0).abs() < 0.5);
        assert!((part.height - 86.6).abs() < 0.5);
        assert_eq!(part.outline.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_disconnected_loops_stay_separate() {
        let segments = vec![
            Segment {
                start: Point2D::new(0.0, 0.0),
                end: Point2D::new(10.0, 0.0),
            },
            Segment {
                start: Point2D::new(10.0, 0.0),
                end: Point2D::new(5.0, 10.0),
            },
            Segment {
                start: Point2D::new(5.0, 10.0),
                end: Point2D::new(0.0, 0.0),
            },
            Segment {
                start: Point2D::new(100.0, 100.0),
                end: Point2D::new(200.0, 100.0),
            },
            Segment {
                start: Point2D::new(200.0, 100.0),
                end: Point2D::new(150.0, 200.0),
            },
            Segment {
                start: Point2D::new(150.0, 200.0),
                end: Point2D::new(100.0, 100.0),
            },
        ];
        let (loops, open) = chain_segments(&segments, 0.01);
        assert_eq!(loops.len(), 2);
        assert_eq!(open, 0);
        assert_eq!(loops[0].len(), 3);
    }

    #[test]
    fn test_open_chain_is_discarded() {
        let segments = vec![
            Segment {
                start: Point2D::new(0.0, 0.0),
                end: Point2D::new(10.0, 0.0),
            },
            Segment {
                start: Point2D::new(10.0, 0.0),
                end: Point2D::new(10.0, 10.0),
            },
        ];
        let (loops, open) = chain_segments(&segments, 0.01);
        assert!(loops.is_empty());
        assert_eq!(open, 1);
    }

    #[test]
    fn test_small_outline_filtered_by_threshold() {
        // A 5x5 rectangle is below the default 100 mm2 threshold.
        let body = [
            (0, "LWPOLYLINE"),
            (10, "0"),
            (20, "0"),
            (10, "5"),
            (20, "0"),
            (10, "5"),
            (20, "5"),
            (10, "0"),
            (20, "5"),
        ];
        let file = dxf_file(&entities_section(&body));

        let report = import_dxf(file.path());
        assert!(report.parts.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("threshold")));

        let report = import_dxf_with_options(file.path(), 1.0);
        assert_eq!(report.parts.len(), 1);
    }

    #[test]
    fn test_outline_is_normalized_to_origin() {
        let body = [
            (0, "LWPOLYLINE"),
            (10, "500"),
            (20, "300"),
            (10, "700"),
            (20, "300"),
            (10, "700"),
            (20, "450"),
            (10, "500"),
            (20, "450"),
        ];
        let file = dxf_file(&entities_section(&body));
        let report = import_dxf(file.path());

        let outline = report.parts[0].outline.as_ref().unwrap();
        let (min, max) = outline.bounding_box();
        assert_eq!((min.x, min.y), (0.0, 0.0));
        assert!((max.x - 200.0).abs() < 0.1);
        assert!((max.y - 150.0).abs() < 0.1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let report = import_dxf("/nonexistent/drawing.dxf");
        assert!(!report.errors.is_empty());
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = dxf_file(&[]);
        let report = import_dxf(file.path());
        assert!(!report.errors.is_empty());
    }
}
