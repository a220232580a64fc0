//! GCode dialect profiles.
//!
//! A profile is a table of strings: comment syntax, prologue and epilogue
//! lines, spindle commands, and move words. All dialects here use G0/G1 in
//! metric absolute mode; they differ in framing and comment style.
//!
//! Tokens: `[SafeZ]` in `end_code` is replaced with the formatted safe
//! height; `[Speed]` in `spindle_start` is replaced with the RPM.

use slabcut_model::GCodeDialect;

/// A GCode dialect description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GCodeProfile {
    pub name: &'static str,
    pub comment_prefix: &'static str,
    pub comment_suffix: &'static str,
    /// Lines emitted verbatim after the header comment block.
    pub start_code: &'static [&'static str],
    /// Lines emitted at the end of the program; `[SafeZ]` is substituted.
    pub end_code: &'static [&'static str],
    /// Spindle-on command with a `[Speed]` token; empty disables spindle
    /// commands entirely.
    pub spindle_start: &'static str,
    pub spindle_stop: &'static str,
    pub rapid_move: &'static str,
    pub feed_move: &'static str,
    /// Coordinate precision in decimal places.
    pub decimal_places: usize,
}

const GENERIC: GCodeProfile = GCodeProfile {
    name: "Generic",
    comment_prefix: ";",
    comment_suffix: "",
    start_code: &["G90", "G21", "G17"],
    end_code: &["G0 Z[SafeZ]", "G0 X0 Y0", "M30"],
    spindle_start: "M3 S[Speed]",
    spindle_stop: "M5",
    rapid_move: "G0",
    feed_move: "G1",
    decimal_places: 3,
};

const MACH3: GCodeProfile = GCodeProfile {
    name: "Mach3",
    comment_prefix: ";",
    comment_suffix: "",
    start_code: &["G90", "G21", "G17", "G40", "G49"],
    end_code: &["G0 Z[SafeZ]", "G0 X0 Y0", "M30"],
    spindle_start: "M3 S[Speed]",
    spindle_stop: "M5",
    rapid_move: "G0",
    feed_move: "G1",
    decimal_places: 4,
};

const LINUXCNC: GCodeProfile = GCodeProfile {
    name: "LinuxCNC",
    comment_prefix: ";",
    comment_suffix: "",
    start_code: &["G90 G21 G17 G40 G49", "G54"],
    end_code: &["G0 Z[SafeZ]", "G0 X0 Y0", "M2"],
    spindle_start: "M3 S[Speed]",
    spindle_stop: "M5",
    rapid_move: "G0",
    feed_move: "G1",
    decimal_places: 4,
};

const GRBL: GCodeProfile = GCodeProfile {
    name: "GRBL",
    comment_prefix: ";",
    comment_suffix: "",
    start_code: &["G90", "G21", "G17"],
    end_code: &["G0 Z[SafeZ]", "G0 X0 Y0", "M2"],
    spindle_start: "M3 S[Speed]",
    spindle_stop: "M5",
    rapid_move: "G0",
    feed_move: "G1",
    decimal_places: 3,
};

const FANUC: GCodeProfile = GCodeProfile {
    name: "Fanuc",
    comment_prefix: "(",
    comment_suffix: ")",
    start_code: &["%", "O0001", "G90 G21 G17", "G40 G49 G80"],
    end_code: &["G0 Z[SafeZ]", "G0 X0 Y0", "M30", "%"],
    spindle_start: "M03 S[Speed]",
    spindle_stop: "M05",
    rapid_move: "G0",
    feed_move: "G1",
    decimal_places: 3,
};

impl GCodeProfile {
    /// Returns the table for a dialect. `Unknown` maps to Generic; the
    /// generator is responsible for surfacing the fallback warning.
    pub fn for_dialect(dialect: GCodeDialect) -> &'static GCodeProfile {
        match dialect {
            GCodeDialect::Generic | GCodeDialect::Unknown => &GENERIC,
            GCodeDialect::Mach3 => &MACH3,
            GCodeDialect::LinuxCnc => &LINUXCNC,
            GCodeDialect::Grbl => &GRBL,
            GCodeDialect::Fanuc => &FANUC,
        }
    }

    /// All known profiles, for UI pickers.
    pub fn all() -> &'static [&'static GCodeProfile] {
        &[&GENERIC, &MACH3, &LINUXCNC, &GRBL, &FANUC]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_lookup() {
        assert_eq!(GCodeProfile::for_dialect(GCodeDialect::Generic).name, "Generic");
        assert_eq!(GCodeProfile::for_dialect(GCodeDialect::Fanuc).name, "Fanuc");
        assert_eq!(GCodeProfile::for_dialect(GCodeDialect::Grbl).name, "GRBL");
    }

    #[test]
    fn test_unknown_falls_back_to_generic() {
        assert_eq!(GCodeProfile::for_dialect(GCodeDialect::Unknown).name, "Generic");
    }

    #[test]
    fn test_fanuc_uses_paren_comments() {
        let fanuc = GCodeProfile::for_dialect(GCodeDialect::Fanuc);
        assert_eq!(fanuc.comment_prefix, "(");
        assert_eq!(fanuc.comment_suffix, ")");
    }

    #[test]
    fn test_end_code_carries_safe_z_token() {
        for profile in GCodeProfile::all() {
            assert!(profile.end_code.iter().any(|line| line.contains("[SafeZ]")));
            assert!(profile.spindle_start.contains("[Speed]"));
        }
    }
}
