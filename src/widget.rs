//! The hydrograph widget: display selection, hover/click state and map sync.
//!
//! All transitions are synchronous. The widget keeps the geometry of what
//! should be on screen (lines, focus marker, hit surface); drawing it is left
//! to a rendering adapter such as [`crate::viz`] or the GUI binary.
//!
//! Pointer coordinates are plot-local: `(0, 0)` is the top-left corner of the
//! plot area inside the margins. Use [`ChartConfig::to_plot`] to convert.

use crate::config::ChartConfig;
use crate::hit::{Extent, HitSurface};
use crate::map::MapCollaborator;
use crate::models::{Dataset, Sample};
use crate::scale::ChartScales;
use crate::selection::{DisplaySelection, LineClass, Visibility};
use crate::source;

/// Where the focus marker is parked while nothing is hovered.
pub const OFF_CANVAS: (f64, f64) = (-100.0, -100.0);

/// Circle + label marking the hovered sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusMarker {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

impl FocusMarker {
    fn parked() -> Self {
        Self {
            x: OFF_CANVAS.0,
            y: OFF_CANVAS.1,
            label: String::new(),
        }
    }

    pub fn is_off_canvas(&self) -> bool {
        (self.x, self.y) == OFF_CANVAS
    }
}

/// Geometry of one series line as it should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub key: String,
    pub name: String,
    pub class: LineClass,
    /// Plot-local pixel coordinates in chronological order.
    pub points: Vec<(f64, f64)>,
}

/// Interactive hydrograph linked to a map collaborator.
#[derive(Debug)]
pub struct HydrographWidget<M: MapCollaborator> {
    config: ChartConfig,
    map: M,
    dataset: Option<Dataset>,
    selection: DisplaySelection,
    scales: ChartScales,
    lines: Vec<RenderedLine>,
    surface: HitSurface,
    focus: FocusMarker,
    hovered: Option<Sample>,
    activated: Option<String>,
    renders: usize,
}

impl<M: MapCollaborator> HydrographWidget<M> {
    /// Create an empty widget. Nothing is drawn until data is loaded.
    pub fn new(config: ChartConfig, map: M) -> Self {
        let selection = DisplaySelection::new(config.display_ids.iter().cloned());
        let (w, h) = (config.inner_width(), config.inner_height());
        let extent = Extent::padded(w, h, &config.margin);
        Self {
            scales: ChartScales::fit(std::iter::empty::<&Sample>(), w, h),
            surface: HitSurface::empty(extent),
            config,
            map,
            dataset: None,
            selection,
            lines: Vec::new(),
            focus: FocusMarker::parked(),
            hovered: None,
            activated: None,
            renders: 0,
        }
    }

    /// Fetch the dataset from `config.data_path` and render it.
    ///
    /// A failed fetch is logged and leaves the widget empty; there is no retry.
    pub fn init(&mut self) {
        match source::load_dataset(&self.config.data_path) {
            Ok(dataset) => self.load(dataset),
            Err(e) => log::error!("hydrograph: could not load {}: {e:#}", self.config.data_path),
        }
    }

    /// Install an already fetched dataset and render the requested selection.
    pub fn load(&mut self, dataset: Dataset) {
        let unknown = self.selection.retain_known(&dataset);
        if !unknown.is_empty() {
            log::debug!("hydrograph: ignoring unknown ids {unknown:?}");
        }
        let shown: Vec<String> = self.selection.keys().to_vec();
        self.dataset = Some(dataset);
        self.notify_shown(&shown);
        self.rerender();
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Keys currently on screen, in display order.
    pub fn display_ids(&self) -> &[String] {
        self.selection.keys()
    }

    /// Replace the display selection and re-render. Unknown ids are dropped.
    pub fn change_lines<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let Some(dataset) = self.dataset.as_ref() else {
            self.selection = DisplaySelection::new(ids);
            return;
        };
        let known = ids.into_iter().filter(|k| dataset.contains(k));
        let shown = self.selection.replace(known);
        self.notify_shown(&shown);
        self.rerender();
    }

    /// Make `keys` visible. Already visible and unknown keys are ignored.
    pub fn show<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(dataset) = self.dataset.as_ref() else {
            self.selection.show(keys);
            return;
        };
        let known: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| dataset.contains(k))
            .collect();
        let shown = self.selection.show(known);
        if shown.is_empty() {
            return;
        }
        self.notify_shown(&shown);
        self.rerender();
    }

    /// Hide `keys`. Keys that are not visible are ignored.
    pub fn hide<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.selection.hide(keys);
        if removed.is_empty() || self.dataset.is_none() {
            return;
        }
        self.rerender();
    }

    /// Pointer entered the cell of `sample`.
    pub fn hover_enter(&mut self, sample: &Sample) {
        if !self.is_loaded() || !self.selection.contains(&sample.series_key) {
            return;
        }
        if let Some(current) = &self.hovered {
            if current == sample {
                return;
            }
            self.hover_exit();
        }
        self.activate_line(&sample.series_key);
        let (x, y) = self.scales.project(sample);
        self.focus = FocusMarker {
            x,
            y,
            label: sample.focus_label(),
        };
        self.map.mouse_move(&sample.display_name, &sample.series_key);
        self.hovered = Some(sample.clone());
    }

    /// Pointer left the hovered cell. The marker is parked off-canvas.
    pub fn hover_exit(&mut self) {
        let Some(previous) = self.hovered.take() else {
            return;
        };
        self.deactivate_line(&previous.series_key);
        self.focus = FocusMarker::parked();
        self.map.mouse_out();
    }

    /// Click on `sample`: its series leaves the chart for good.
    ///
    /// Only an explicit [`show`](Self::show) or [`change_lines`](Self::change_lines)
    /// brings the series back.
    pub fn activate(&mut self, sample: &Sample) {
        if !self.is_loaded() || !self.selection.contains(&sample.series_key) {
            return;
        }
        let key = sample.series_key.clone();
        self.map.remove_accent(&key);
        self.selection.hide([key.as_str()]);
        self.activated = Some(key);
        self.rerender();
    }

    /// Route a pointer position through the hit surface.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match self.surface.find(x, y).map(|p| p.sample.clone()) {
            Some(sample) => self.hover_enter(&sample),
            None => self.hover_exit(),
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover_exit();
    }

    /// Route a click through the hit surface. Returns the key that was removed.
    pub fn click(&mut self, x: f64, y: f64) -> Option<String> {
        let sample = self.surface.find(x, y)?.sample.clone();
        self.activate(&sample);
        Some(sample.series_key)
    }

    /// Highlight a rendered line. No effect on the display selection.
    pub fn activate_line(&mut self, key: &str) {
        self.set_line_class(key, LineClass::Active);
    }

    pub fn deactivate_line(&mut self, key: &str) {
        self.set_line_class(key, LineClass::Inactive);
    }

    fn set_line_class(&mut self, key: &str, class: LineClass) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.key == key) {
            line.class = class;
        }
    }

    fn notify_shown(&mut self, keys: &[String]) {
        for key in keys {
            self.map.accent(key);
        }
    }

    /// Rebuild scales, lines and hit surface from scratch for the current selection.
    fn rerender(&mut self) {
        let Some(dataset) = self.dataset.as_ref() else {
            return;
        };
        let (w, h) = (self.config.inner_width(), self.config.inner_height());

        let displayed: Vec<&Sample> = self
            .selection
            .keys()
            .iter()
            .filter_map(|k| dataset.get(k))
            .flat_map(|s| s.samples())
            .collect();
        let scales = ChartScales::fit(displayed.iter().copied(), w, h);

        let lines: Vec<RenderedLine> = self
            .selection
            .keys()
            .iter()
            .filter_map(|k| dataset.get(k))
            .map(|series| RenderedLine {
                key: series.key.clone(),
                name: series.display_name.clone(),
                class: LineClass::Inactive,
                points: series.samples().iter().map(|s| scales.project(s)).collect(),
            })
            .collect();

        let surface = HitSurface::build(
            displayed.iter().map(|s| {
                let (x, y) = scales.project(s);
                (x, y, (*s).clone())
            }),
            Extent::padded(w, h, &self.config.margin),
        );

        self.scales = scales;
        self.lines = lines;
        self.surface = surface;
        // The old marker pointed at geometry that no longer exists.
        self.hovered = None;
        self.focus = FocusMarker::parked();
        self.renders += 1;
        log::debug!(
            "hydrograph: rendered {} line(s), {} hit cell(s)",
            self.lines.len(),
            self.surface.len()
        );
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn visibility(&self, key: &str) -> Visibility {
        self.selection.visibility(key)
    }

    pub fn scales(&self) -> &ChartScales {
        &self.scales
    }

    pub fn surface(&self) -> &HitSurface {
        &self.surface
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn focus(&self) -> &FocusMarker {
        &self.focus
    }

    pub fn hovered(&self) -> Option<&Sample> {
        self.hovered.as_ref()
    }

    pub fn hovered_key(&self) -> Option<&str> {
        self.hovered.as_ref().map(|s| s.series_key.as_str())
    }

    /// Last series removed by a click.
    pub fn activated(&self) -> Option<&str> {
        self.activated.as_deref()
    }

    /// Number of full re-renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Samples of the visible series, in display order.
    pub fn displayed_samples(&self) -> Vec<&Sample> {
        let Some(dataset) = self.dataset.as_ref() else {
            return Vec::new();
        };
        self.selection
            .keys()
            .iter()
            .filter_map(|k| dataset.get(k))
            .flat_map(|s| s.samples())
            .collect()
    }
}
