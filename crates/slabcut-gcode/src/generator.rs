//! Per-sheet GCode emission.
//!
//! Every placement becomes a rectangular perimeter cut offset outward by the
//! tool radius, milled in multiple Z passes with optional holding tabs on the
//! final pass. The output is plain `\n`-terminated UTF-8 with the dialect's
//! comment syntax; numbers are fixed-point at the profile's precision.

use slabcut_model::{CutSettings, GCodeDialect, OptimizeResult, Placement, SheetResult};

use crate::profile::GCodeProfile;

/// Produces GCode from an optimized sheet layout.
pub struct Generator {
    settings: CutSettings,
    profile: &'static GCodeProfile,
    profile_fallback: bool,
}

/// A holding tab on one side of a perimeter.
/// Sides are numbered along the cut direction: 0 = bottom, 1 = right,
/// 2 = top, 3 = left.
#[derive(Debug, Clone, Copy)]
struct Tab {
    side: usize,
    /// Tab centre, as a distance along its side.
    center: f64,
}

impl Generator {
    pub fn new(settings: CutSettings) -> Self {
        let profile_fallback = settings.gcode_profile == GCodeDialect::Unknown;
        if profile_fallback {
            log::warn!("unknown GCode profile, falling back to Generic");
        }
        Self {
            profile: GCodeProfile::for_dialect(settings.gcode_profile),
            profile_fallback,
            settings,
        }
    }

    /// Generates the GCode for a single sheet. `sheet_index` is 1-based and
    /// only appears in the header comment.
    pub fn generate_sheet(&self, sheet: &SheetResult, sheet_index: usize) -> String {
        let mut out = String::new();
        self.write_header(&mut out, sheet, sheet_index);
        for (i, placement) in sheet.placements.iter().enumerate() {
            self.write_part(&mut out, placement, i + 1);
        }
        self.write_footer(&mut out);
        out
    }

    /// One GCode program per sheet, in sheet order.
    pub fn generate_all(&self, result: &OptimizeResult) -> Vec<String> {
        result
            .sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| self.generate_sheet(sheet, i + 1))
            .collect()
    }

    fn write_header(&self, out: &mut String, sheet: &SheetResult, idx: usize) {
        let s = &self.settings;

        out.push_str(&self.comment(&format!(
            "SlabCut GCode - Sheet {} ({})",
            idx, sheet.stock.label
        )));
        out.push_str(&self.comment(&format!(
            "Stock: {:.1} x {:.1} mm",
            sheet.stock.width, sheet.stock.height
        )));
        out.push_str(&self.comment(&format!(
            "Parts: {}, Efficiency: {:.1}%",
            sheet.placements.len(),
            sheet.efficiency()
        )));
        out.push_str(&self.comment(&format!(
            "Tool: {:.1}mm, Feed: {:.0} mm/min, Plunge: {:.0} mm/min",
            s.tool_diameter, s.feed_rate, s.plunge_rate
        )));
        out.push_str(&self.comment(&format!(
            "Depth: {:.1}mm in {:.1}mm passes",
            s.cut_depth, s.pass_depth
        )));
        out.push_str(&self.comment(&format!("Profile: {}", self.profile.name)));
        if self.profile_fallback {
            out.push_str(
                &self.comment("Warning: unknown GCode profile requested, using Generic"),
            );
        }
        out.push('\n');

        for line in self.profile.start_code {
            out.push_str(line);
            out.push('\n');
        }

        if !self.profile.spindle_start.is_empty() {
            let rpm = format!("{:.0}", s.spindle_speed);
            out.push_str(&self.profile.spindle_start.replace("[Speed]", &rpm));
            out.push('\n');
        }

        out.push_str(&format!(
            "{} X{} Y{}\n",
            self.profile.rapid_move,
            self.fmt(0.0),
            self.fmt(0.0)
        ));
        out.push_str(&format!(
            "{} Z{}\n",
            self.profile.rapid_move,
            self.fmt(s.safe_z)
        ));
        out.push('\n');
    }

    fn write_footer(&self, out: &mut String) {
        out.push('\n');
        out.push_str(&self.comment("=== Job complete ==="));
        for line in self.profile.end_code {
            out.push_str(&line.replace("[SafeZ]", &self.fmt(self.settings.safe_z)));
            out.push('\n');
        }
        if !self.profile.spindle_stop.is_empty() {
            out.push_str(self.profile.spindle_stop);
            out.push('\n');
        }
    }

    fn write_part(&self, out: &mut String, placement: &Placement, part_num: usize) {
        let s = &self.settings;
        let tool_r = s.tool_diameter / 2.0;

        let pw = placement.placed_width();
        let ph = placement.placed_height();

        // Programmed path is offset outward so the tool edge follows the
        // part perimeter.
        let x0 = placement.x - tool_r;
        let y0 = placement.y - tool_r;
        let x1 = placement.x + pw + tool_r;
        let y1 = placement.y + ph + tool_r;

        let rotated = if placement.rotated { " [rotated]" } else { "" };
        out.push_str(&self.comment(&format!(
            "--- Part {}: {} ({:.1} x {:.1}){} ---",
            part_num, placement.part.label, placement.part.width, placement.part.height, rotated
        )));

        let num_passes = (s.cut_depth / s.pass_depth).ceil() as u32;
        let tabs = self.calculate_tabs(placement);

        for pass in 1..=num_passes {
            let depth = (pass as f64 * s.pass_depth).min(s.cut_depth);
            let final_pass = pass == num_passes;

            out.push_str(&self.comment(&format!(
                "Pass {}/{}, depth={:.2}mm",
                pass, num_passes, depth
            )));

            out.push_str(&format!(
                "{} X{} Y{}\n",
                self.profile.rapid_move,
                self.fmt(x0),
                self.fmt(y0)
            ));
            out.push_str(&format!(
                "{} Z{} F{} {}",
                self.profile.feed_move,
                self.fmt(-depth),
                self.fmt(s.plunge_rate),
                self.comment("Plunge")
            ));

            if final_pass && s.part_tabs_per_side > 0 {
                self.write_perimeter_with_tabs(out, x0, y0, x1, y1, depth, &tabs);
            } else {
                self.write_perimeter(out, x0, y0, x1, y1);
            }

            out.push_str(&format!(
                "{} Z{}\n",
                self.profile.rapid_move,
                self.fmt(s.safe_z)
            ));
        }

        out.push('\n');
    }

    /// Full-depth perimeter, starting at the offset min-corner.
    fn write_perimeter(&self, out: &mut String, x0: f64, y0: f64, x1: f64, y1: f64) {
        let feed = self.profile.feed_move;
        out.push_str(&format!(
            "{} X{} Y{} F{}\n",
            feed,
            self.fmt(x1),
            self.fmt(y0),
            self.fmt(self.settings.feed_rate)
        ));
        out.push_str(&format!("{} X{} Y{}\n", feed, self.fmt(x1), self.fmt(y1)));
        out.push_str(&format!("{} X{} Y{}\n", feed, self.fmt(x0), self.fmt(y1)));
        out.push_str(&format!("{} X{} Y{}\n", feed, self.fmt(x0), self.fmt(y0)));
    }

    /// Tab centres for all four sides, equally spaced along each side of the
    /// offset rectangle.
    fn calculate_tabs(&self, placement: &Placement) -> Vec<Tab> {
        let n = self.settings.part_tabs_per_side;
        if n == 0 {
            return Vec::new();
        }

        let pw = placement.placed_width() + self.settings.tool_diameter;
        let ph = placement.placed_height() + self.settings.tool_diameter;

        let mut tabs = Vec::new();
        for side in 0..4 {
            let length = if side % 2 == 0 { pw } else { ph };
            let spacing = length / (n + 1) as f64;
            for t in 1..=n {
                tabs.push(Tab {
                    side,
                    center: spacing * t as f64,
                });
            }
        }
        tabs
    }

    fn write_perimeter_with_tabs(
        &self,
        out: &mut String,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        depth: f64,
        tabs: &[Tab],
    ) {
        let tab_depth = (depth - self.settings.part_tab_height).max(0.0);
        let tw = self.settings.part_tab_width;

        let sides = [
            (x0, y0, x1, y0), // bottom
            (x1, y0, x1, y1), // right
            (x1, y1, x0, y1), // top
            (x0, y1, x0, y0), // left
        ];
        for (side, &(sx, sy, ex, ey)) in sides.iter().enumerate() {
            let side_tabs: Vec<Tab> = tabs.iter().copied().filter(|t| t.side == side).collect();
            self.write_side_with_tabs(out, sx, sy, ex, ey, depth, tab_depth, tw, &side_tabs);
        }
    }

    /// Cuts one side at full depth, lifting to the tab depth across each tab.
    #[allow(clippy::too_many_arguments)]
    fn write_side_with_tabs(
        &self,
        out: &mut String,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        cut_depth: f64,
        tab_depth: f64,
        tab_width: f64,
        tabs: &[Tab],
    ) {
        let feed = self.profile.feed_move;
        let feed_rate = self.fmt(self.settings.feed_rate);

        if tabs.is_empty() {
            out.push_str(&format!(
                "{} X{} Y{} F{}\n",
                feed,
                self.fmt(x1),
                self.fmt(y1),
                feed_rate
            ));
            return;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        if length < 0.001 {
            return;
        }
        let nx = dx / length;
        let ny = dy / length;

        let mut cursor = 0.0;
        for tab in tabs {
            let tab_start = tab.center - tab_width / 2.0;
            let tab_end = tab.center + tab_width / 2.0;

            if tab_start > cursor {
                let px = x0 + nx * tab_start;
                let py = y0 + ny * tab_start;
                out.push_str(&format!(
                    "{} X{} Y{} F{}\n",
                    feed,
                    self.fmt(px),
                    self.fmt(py),
                    feed_rate
                ));
            }

            // Lift over the tab, traverse, plunge back to full depth.
            out.push_str(&format!("{} Z{}\n", feed, self.fmt(-tab_depth)));
            let px = x0 + nx * tab_end;
            let py = y0 + ny * tab_end;
            out.push_str(&format!("{} X{} Y{}\n", feed, self.fmt(px), self.fmt(py)));
            out.push_str(&format!("{} Z{}\n", feed, self.fmt(-cut_depth)));

            cursor = tab_end;
        }

        out.push_str(&format!(
            "{} X{} Y{} F{}\n",
            feed,
            self.fmt(x1),
            self.fmt(y1),
            feed_rate
        ));
    }

    /// Wraps text in the profile's comment syntax, newline included.
    fn comment(&self, text: &str) -> String {
        format!(
            "{} {}{}\n",
            self.profile.comment_prefix, text, self.profile.comment_suffix
        )
    }

    /// Formats a coordinate at the profile's precision.
    fn fmt(&self, value: f64) -> String {
        format!("{:.*}", self.profile.decimal_places, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slabcut_model::{Part, StockSheet};

    fn s5_settings() -> CutSettings {
        let mut s = CutSettings::default();
        s.cut_depth = 12.0;
        s.pass_depth = 5.0;
        s.tool_diameter = 6.0;
        s.safe_z = 5.0;
        s.feed_rate = 1000.0;
        s.plunge_rate = 300.0;
        s.part_tabs_per_side = 0;
        s
    }

    fn one_part_sheet() -> SheetResult {
        let mut sheet = SheetResult::new(StockSheet::new("Board", 1000.0, 500.0, 1));
        sheet.placements.push(Placement {
            part: Part::new("Panel", 100.0, 50.0, 1),
            x: 0.0,
            y: 0.0,
            rotated: false,
        });
        sheet
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_passes_and_depths() {
        let generator = Generator::new(s5_settings());
        let code = generator.generate_sheet(&one_part_sheet(), 1);

        // Three passes: 5, 10, then the 12mm remainder.
        assert!(code.contains("Pass 1/3, depth=5.00mm"));
        assert!(code.contains("Pass 2/3, depth=10.00mm"));
        assert!(code.contains("Pass 3/3, depth=12.00mm"));
        assert!(code.contains("G1 Z-5.000 F300.000"));
        assert!(code.contains("G1 Z-10.000 F300.000"));
        assert!(code.contains("G1 Z-12.000 F300.000"));

        // Each pass starts at the offset corner and retracts to safe Z.
        assert_eq!(count(&code, "G0 X-3.000 Y-3.000"), 3);
        assert!(count(&code, "G0 Z5.000") >= 3);

        // Four perimeter feed moves per pass.
        assert_eq!(count(&code, "G1 X"), 12);
    }

    #[test]
    fn test_perimeter_follows_offset_rectangle() {
        let generator = Generator::new(s5_settings());
        let code = generator.generate_sheet(&one_part_sheet(), 1);

        assert!(code.contains("G1 X103.000 Y-3.000 F1000.000"));
        assert!(code.contains("G1 X103.000 Y53.000"));
        assert!(code.contains("G1 X-3.000 Y53.000"));
        assert!(code.contains("G1 X-3.000 Y-3.000"));
    }

    #[test]
    fn test_no_tabs_means_no_lift_sequences() {
        let generator = Generator::new(s5_settings());
        let code = generator.generate_sheet(&one_part_sheet(), 1);
        // Only the three plunges move Z at feed rate.
        assert_eq!(count(&code, "G1 Z"), 3);
    }

    #[test]
    fn test_tabs_lift_and_plunge_on_final_pass() {
        let mut settings = s5_settings();
        settings.cut_depth = 12.0;
        settings.pass_depth = 12.0;
        settings.part_tabs_per_side = 1;
        settings.part_tab_width = 8.0;
        settings.part_tab_height = 3.0;

        let generator = Generator::new(settings);
        let code = generator.generate_sheet(&one_part_sheet(), 1);

        // Bottom side is 106mm long; the single tab centres at 53mm, which
        // is X46..X54 in offset coordinates.
        assert!(code.contains("G1 X46.000 Y-3.000 F1000.000"));
        assert!(code.contains("G1 Z-9.000"));
        assert!(code.contains("G1 X54.000 Y-3.000"));
        // Plunge back to full depth after the tab.
        assert!(count(&code, "G1 Z-12.000") > 1);
    }

    #[test]
    fn test_header_and_footer_content() {
        let generator = Generator::new(s5_settings());
        let code = generator.generate_sheet(&one_part_sheet(), 2);

        assert!(code.starts_with("; SlabCut GCode - Sheet 2 (Board)\n"));
        assert!(code.contains("; Stock: 1000.0 x 500.0 mm"));
        assert!(code.contains("; Profile: Generic"));
        assert!(code.contains("M3 S18000"));
        assert!(code.contains("M5"));
        // [SafeZ] token substituted in the epilogue.
        assert!(code.contains("G0 Z5.000\nG0 X0 Y0\nM30"));
        assert!(!code.contains("[SafeZ]"));
        assert!(!code.contains('\r'));
    }

    #[test]
    fn test_fanuc_comment_syntax() {
        let mut settings = s5_settings();
        settings.gcode_profile = GCodeDialect::Fanuc;
        let generator = Generator::new(settings);
        let code = generator.generate_sheet(&one_part_sheet(), 1);

        assert!(code.starts_with("( SlabCut GCode - Sheet 1 (Board))\n"));
        assert!(code.contains("%\nO0001\n"));
        assert!(code.contains("M03 S18000"));
        assert!(!code.contains("; "));
    }

    #[test]
    fn test_unknown_profile_warns_and_uses_generic() {
        let mut settings = s5_settings();
        settings.gcode_profile = GCodeDialect::Unknown;
        let generator = Generator::new(settings);
        let code = generator.generate_sheet(&one_part_sheet(), 1);

        assert!(code.contains("; Profile: Generic"));
        assert!(code.contains("unknown GCode profile"));
    }

    #[test]
    fn test_rotated_banner() {
        let generator = Generator::new(s5_settings());
        let mut sheet = one_part_sheet();
        sheet.placements[0].rotated = true;
        let code = generator.generate_sheet(&sheet, 1);
        assert!(code.contains("--- Part 1: Panel (100.0 x 50.0) [rotated] ---"));
    }

    #[test]
    fn test_generate_all_emits_one_program_per_sheet() {
        let generator = Generator::new(s5_settings());
        let result = OptimizeResult {
            sheets: vec![one_part_sheet(), one_part_sheet()],
            unplaced: Vec::new(),
        };
        let programs = generator.generate_all(&result);
        assert_eq!(programs.len(), 2);
        assert!(programs[1].contains("Sheet 2"));
    }
}
