//! Utility functions for rendering: colors and locale mapping.

use num_format::Locale;
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Same palette as plain RGB triples, for non-plotters renderers.
pub fn office_rgb(idx: usize) -> (u8, u8, u8) {
    let RGBColor(r, g, b) = OFFICE10[idx % OFFICE10.len()];
    (r, g, b)
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en, // default
    }
}

/// Log ticks get a label only on 1, 2 and 5 multiples once they get crowded.
pub fn label_log_tick(v: f64, crowded: bool) -> bool {
    if !crowded {
        return true;
    }
    let lead = v / 10f64.powf((v.log10() + 1e-9).floor());
    [1.0, 2.0, 5.0].iter().any(|m| (lead - m).abs() < 1e-6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(office_rgb(0), office_rgb(10));
        assert_eq!(office_rgb(1), (237, 125, 49));
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(map_locale("xx").name(), Locale::en.name());
        assert_eq!(map_locale("DE").name(), Locale::de.name());
    }

    #[test]
    fn crowded_log_ticks_keep_round_leads() {
        assert!(label_log_tick(200.0, true));
        assert!(label_log_tick(5000.0, true));
        assert!(!label_log_tick(300.0, true));
        assert!(label_log_tick(300.0, false));
    }
}
