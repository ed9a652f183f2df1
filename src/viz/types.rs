//! Public types and constants for the rendering adapter.

/// Options for a static render of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Locale tag for the value axis (`en`, `de`, ...).
    pub locale: String,
    /// Outline the Voronoi hit cells underneath the lines.
    pub show_cells: bool,
    /// Site legend in the top margin.
    pub legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            locale: "en".into(),
            show_cells: false,
            legend: true,
        }
    }
}

/// Approximate number of ticks requested from each scale.
pub const TIME_TICKS: usize = 8;
pub const VALUE_TICKS: usize = 10;

/// Axis and label font size in pixels.
pub const LABEL_FONT_PX: u32 = 11;
