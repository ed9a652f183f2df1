//! Static rendering adapter: draw the current widget state to **SVG** or **PNG**.
//!
//! - One line per visible site (Microsoft Office palette), hovered line emphasized
//! - Time axis labelled `%B %e`, log value axis with locale-aware whole numbers
//! - Focus marker with its label drawn inline next to the circle
//! - Optional outline of the Voronoi hit cells
//!
//! Everything is drawn from the geometry the widget already computed, so the
//! picture lines up pixel for pixel with the hit surface.

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::RenderOptions;

use crate::error::FloodvizError;
use crate::map::MapCollaborator;
use crate::scale::{format_log_tick, format_time_tick};
use crate::selection::LineClass;
use crate::widget::HydrographWidget;
use anyhow::{Result, anyhow, bail};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::draw_site_legend;
use text::estimate_text_width_px;
use types::{LABEL_FONT_PX, TIME_TICKS, VALUE_TICKS};
use util::{label_log_tick, map_locale, office_color};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Render the widget's current state. The format follows the file extension
/// (`.svg` or `.png`).
pub fn render_widget<M, P>(widget: &HydrographWidget<M>, out_path: P, options: &RenderOptions) -> Result<()>
where
    M: MapCollaborator,
    P: AsRef<Path>,
{
    if !widget.is_loaded() {
        bail!("nothing to render: no data loaded");
    }
    let cfg = widget.config();
    cfg.validate()?;
    ensure_fonts_registered();

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (cfg.width, cfg.height);

    match out_path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("svg") => {
            let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
            draw_widget(root, widget, options)
        }
        Some("png") => {
            let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
            draw_widget(root, widget, options)
        }
        other => Err(FloodvizError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

/// Render to an in-memory SVG document.
pub fn render_widget_svg_string<M: MapCollaborator>(
    widget: &HydrographWidget<M>,
    options: &RenderOptions,
) -> Result<String> {
    if !widget.is_loaded() {
        bail!("nothing to render: no data loaded");
    }
    let cfg = widget.config();
    cfg.validate()?;
    ensure_fonts_registered();

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (cfg.width, cfg.height)).into_drawing_area();
        draw_widget(root, widget, options)?;
    }
    Ok(buf)
}

fn draw_widget<DB, M>(
    root: DrawingArea<DB, Shift>,
    widget: &HydrographWidget<M>,
    options: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    M: MapCollaborator,
{
    let cfg = widget.config();
    let scales = widget.scales();
    let (ox, oy) = (cfg.margin.left as f64, cfg.margin.top as f64);
    let (w, h) = (cfg.inner_width(), cfg.inner_height());
    let px = |x: f64, y: f64| ((x + ox).round() as i32, (y + oy).round() as i32);
    let num_locale = map_locale(&options.locale);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 1) Hit cells (debug overlay)
    // ----------------------------
    if options.show_cells {
        let cell_style = RGBColor(220, 220, 220).stroke_width(1);
        for cell in widget.surface().cells().filter(|c| c.len() >= 3) {
            let mut outline: Vec<(i32, i32)> = cell.iter().map(|&(x, y)| px(x, y)).collect();
            outline.push(outline[0]);
            root.draw(&PathElement::new(outline, cell_style))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    // ----------------------------
    // 2) Series lines
    // ----------------------------
    let mut legend_items: Vec<(String, RGBAColor)> = Vec::new();
    for (idx, line) in widget.lines().iter().enumerate() {
        let color = office_color(idx);
        let style = match line.class {
            LineClass::Active => color.stroke_width(3),
            LineClass::Inactive => color.mix(0.7).stroke_width(1),
        };
        let pts: Vec<(i32, i32)> = line
            .points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| px(x, y))
            .collect();
        root.draw(&PathElement::new(pts, style))
            .map_err(|e| anyhow!("{:?}", e))?;
        let label = if line.name.is_empty() {
            line.key.clone()
        } else {
            format!("{} ({})", line.name, line.key)
        };
        legend_items.push((label, color));
    }

    // ----------------------------
    // 3) Axes
    // ----------------------------
    let axis_style = BLACK.stroke_width(1);
    let label_font = (FontFamily::SansSerif, LABEL_FONT_PX).into_font().color(&BLACK);

    root.draw(&PathElement::new(vec![px(0.0, h), px(w, h)], axis_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    for t in scales.x.ticks(TIME_TICKS) {
        let x = scales.x.map(t);
        let (tx, ty) = px(x, h);
        root.draw(&PathElement::new(vec![(tx, ty), (tx, ty + 6)], axis_style))
            .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            format_time_tick(t),
            (tx, ty + 8),
            label_font.clone().pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.draw(&PathElement::new(vec![px(0.0, 0.0), px(0.0, h)], axis_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    let value_ticks = scales.y.ticks(VALUE_TICKS);
    let crowded = value_ticks.len() > VALUE_TICKS;
    for v in value_ticks {
        let y = scales.y.map(v);
        if !y.is_finite() {
            continue;
        }
        let (tx, ty) = px(0.0, y);
        root.draw(&PathElement::new(vec![(tx - 6, ty), (tx, ty)], axis_style))
            .map_err(|e| anyhow!("{:?}", e))?;
        if label_log_tick(v, crowded) {
            root.draw(&Text::new(
                format_log_tick(v, num_locale),
                (tx - 8, ty),
                label_font.clone().pos(Pos::new(HPos::Right, VPos::Center)),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    // ----------------------------
    // 4) Legend
    // ----------------------------
    if options.legend && !legend_items.is_empty() {
        draw_site_legend(
            &root,
            &legend_items,
            cfg.margin.left as i32,
            (cfg.margin.top / 2) as i32,
            cfg.width as i32 - cfg.margin.right as i32,
            LABEL_FONT_PX,
        )?;
    }

    // ----------------------------
    // 5) Focus marker with inline label
    // ----------------------------
    let focus = widget.focus();
    if !focus.is_off_canvas() {
        let (fx, fy) = px(focus.x, focus.y);
        root.draw(&Circle::new((fx, fy), 4, BLACK.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?;
        let text_w = estimate_text_width_px(&focus.label, LABEL_FONT_PX) as i32;
        // Flip the label to the left of the marker when it would run off the canvas.
        let anchor = if fx + text_w > cfg.width as i32 {
            HPos::Right
        } else {
            HPos::Left
        };
        root.draw(&Text::new(
            focus.label.clone(),
            (fx, fy - 10),
            label_font.clone().pos(Pos::new(anchor, VPos::Bottom)),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
