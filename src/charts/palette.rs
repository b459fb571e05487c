//! Fixed score colors shared by interactive and exported charts.

use crate::data::ScoreKind;
use egui::Color32;
use plotters::style::RGBColor;

/// Score kind → RGB. Written is gold, oral is teal.
pub const SCORE_PALETTE: [(ScoreKind, [u8; 3]); 2] = [
    (ScoreKind::Written, [0xe9, 0xc4, 0x6a]), // #e9c46a
    (ScoreKind::Oral, [0x2a, 0x9d, 0x8f]),    // #2a9d8f
];

pub const fn score_rgb(kind: ScoreKind) -> [u8; 3] {
    match kind {
        ScoreKind::Written => SCORE_PALETTE[0].1,
        ScoreKind::Oral => SCORE_PALETTE[1].1,
    }
}

/// Color for egui_plot charts.
pub const fn score_color(kind: ScoreKind) -> Color32 {
    let [r, g, b] = score_rgb(kind);
    Color32::from_rgb(r, g, b)
}

/// Color for plotters figures.
pub const fn score_rgb_color(kind: ScoreKind) -> RGBColor {
    let [r, g, b] = score_rgb(kind);
    RGBColor(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_a_fixed_table() {
        assert_eq!(score_rgb(ScoreKind::Written), [233, 196, 106]);
        assert_eq!(score_rgb(ScoreKind::Oral), [42, 157, 143]);

        for (kind, rgb) in SCORE_PALETTE {
            assert_eq!(score_rgb(kind), rgb);
            assert_eq!(score_color(kind), Color32::from_rgb(rgb[0], rgb[1], rgb[2]));
            let RGBColor(r, g, b) = score_rgb_color(kind);
            assert_eq!([r, g, b], rgb);
        }
    }

    #[test]
    fn colors_are_available_at_compile_time() {
        const WRITTEN: Color32 = score_color(ScoreKind::Written);
        const ORAL: Color32 = score_color(ScoreKind::Oral);
        assert_ne!(WRITTEN, ORAL);
        // repeated lookups never drift
        assert_eq!(score_color(ScoreKind::Written), WRITTEN);
        assert_eq!(score_color(ScoreKind::Oral), ORAL);
    }
}
