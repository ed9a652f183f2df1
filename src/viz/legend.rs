//! Site legend drawn in the top margin of the chart.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};

/// Lay legend items out left to right starting at `start_x`, stopping at `max_x`.
///
/// Items that do not fit are summarized as `+N more`.
pub fn draw_site_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    start_x: i32,
    center_y: i32,
    max_x: i32,
    font_px: u32,
) -> Result<()> {
    let swatch_w: i32 = 16;
    let gap: i32 = 6;
    let trailing_gap: i32 = 14;
    let max_label_px: u32 = 160;

    let style = (FontFamily::SansSerif, font_px)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let mut x = start_x;
    for (i, (label, color)) in items.iter().enumerate() {
        let text = truncate_to_width(label, font_px, max_label_px);
        let block = swatch_w + gap + estimate_text_width_px(&text, font_px) as i32 + trailing_gap;
        if x + block > max_x {
            let rest = format!("+{} more", items.len() - i);
            root.draw(&Text::new(rest, (x, center_y), style.clone()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            break;
        }
        root.draw(&PathElement::new(
            vec![(x, center_y), (x + swatch_w, center_y)],
            color.stroke_width(3),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(text, (x + swatch_w + gap, center_y), style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        x += block;
    }
    Ok(())
}
