/*!
 * Desktop viewer for floodviz - interactive streamflow hydrographs
 *
 * A cross-platform desktop application providing:
 * - Loading sample JSON from a file or URL in the background
 * - A live chart with nearest-sample hover and click-to-remove
 * - A side panel standing in for the linked site map
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};
use floodviz::config::parse_id_list;
use floodviz::map::MapCollaborator;
use floodviz::models::Dataset;
use floodviz::scale::{format_log_tick, format_time_tick};
use floodviz::selection::{LineClass, Visibility};
use floodviz::viz::util::{label_log_tick, map_locale, office_rgb};
use floodviz::{ChartConfig, HydrographWidget, source};
use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

const EVENT_LOG_LEN: usize = 14;
const LABEL_FONT: f32 = 11.0;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([1000.0, 640.0])
            .with_title("Hydrograph - floodviz"),
        ..Default::default()
    };

    eframe::run_native(
        "floodviz",
        options,
        Box::new(|_cc| Ok(Box::new(FloodvizApp::new()))),
    )
}

/// The "map" side of the linked view: remembers what the chart told it.
#[derive(Debug, Default)]
struct MapPanel {
    accented: BTreeSet<String>,
    pointer: Option<(String, String)>,
    events: VecDeque<String>,
}

impl MapPanel {
    fn record(&mut self, event: String) {
        if self.events.len() == EVENT_LOG_LEN {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

impl MapCollaborator for MapPanel {
    fn accent(&mut self, key: &str) {
        self.accented.insert(key.to_string());
        self.record(format!("accent {key}"));
    }

    fn remove_accent(&mut self, key: &str) {
        self.accented.remove(key);
        self.record(format!("remove_accent {key}"));
    }

    fn mouse_move(&mut self, name: &str, key: &str) {
        self.pointer = Some((name.to_string(), key.to_string()));
        self.record(format!("mouse_move {name} ({key})"));
    }

    fn mouse_out(&mut self) {
        self.pointer = None;
        self.record("mouse_out".to_string());
    }
}

/// Main application state
struct FloodvizApp {
    // Input fields
    data_path: String,
    display_ids: String,
    locale: String,

    chart: HydrographWidget<MapPanel>,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background load
    load_receiver: Option<mpsc::Receiver<LoadResult>>,
}

#[derive(Debug)]
enum LoadResult {
    Loaded(Dataset),
    Error(String),
}

impl FloodvizApp {
    fn new() -> Self {
        // First argument, else a file in the user's home directory
        let data_path = std::env::args().nth(1).unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hydrograph.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            data_path,
            display_ids: String::new(),
            locale: "en".to_string(),
            chart: HydrographWidget::new(ChartConfig::default(), MapPanel::default()),
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            load_receiver: None,
        }
    }

    fn validate_inputs(&self) -> Result<()> {
        if self.data_path.trim().is_empty() {
            anyhow::bail!("Please choose a sample JSON file or enter a URL");
        }
        Ok(())
    }

    fn start_load(&mut self) {
        if let Err(err) = self.validate_inputs() {
            self.error_message = format!("Validation error: {}", err);
            return;
        }

        let config = ChartConfig {
            data_path: self.data_path.trim().to_string(),
            display_ids: parse_id_list(&self.display_ids),
            ..Default::default()
        };
        self.chart = HydrographWidget::new(config, MapPanel::default());

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = format!("Loading {}...", self.data_path.trim());

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);

        let path = self.data_path.trim().to_string();
        thread::spawn(move || {
            let result = match source::load_dataset(&path) {
                Ok(dataset) => LoadResult::Loaded(dataset),
                Err(err) => LoadResult::Error(format!("Failed to load data: {:#}", err)),
            };
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;

            match result {
                LoadResult::Loaded(dataset) => {
                    let sites = dataset.len();
                    let samples = dataset.sample_count();
                    let all: Vec<String> = dataset.keys().map(str::to_string).collect();
                    self.chart.load(dataset);
                    if self.chart.display_ids().is_empty() {
                        self.chart.show(all);
                    }
                    self.status_message = format!("Loaded {} samples of {} site(s)", samples, sites);
                    self.error_message.clear();
                }
                LoadResult::Error(error) => {
                    log::error!("{error}");
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }

    fn site_controls(&mut self, ui: &mut egui::Ui) {
        let sites: Vec<(String, String)> = self
            .chart
            .dataset()
            .map(|d| {
                d.series()
                    .iter()
                    .map(|s| (s.key.clone(), s.display_name.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if sites.is_empty() {
            return;
        }

        ui.horizontal_wrapped(|ui| {
            ui.label("Sites:");
            for (key, name) in sites {
                let mut visible = self.chart.visibility(&key) == Visibility::Visible;
                let label = if name.is_empty() { key.clone() } else { format!("{name} ({key})") };
                if ui.checkbox(&mut visible, label).changed() {
                    if visible {
                        self.chart.show([key]);
                    } else {
                        self.chart.hide([key]);
                    }
                }
            }
        });
    }
}

impl eframe::App for FloodvizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for a completed background load
        self.check_load_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Data:");
                ui.add(egui::TextEdit::singleline(&mut self.data_path).desired_width(420.0))
                    .on_hover_text("Sample JSON file or http(s) URL");
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                {
                    self.data_path = path.to_string_lossy().to_string();
                }
                if ui.add_enabled(!self.is_loading, egui::Button::new("Load")).clicked() {
                    self.start_load();
                }
                if self.is_loading {
                    ui.spinner();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Display:");
                ui.text_edit_singleline(&mut self.display_ids)
                    .on_hover_text("Site keys separated by commas; empty shows every site");
                if ui
                    .add_enabled(self.chart.is_loaded(), egui::Button::new("Apply"))
                    .clicked()
                {
                    self.chart.change_lines(parse_id_list(&self.display_ids));
                }
                ui.label("Locale:");
                egui::ComboBox::from_id_salt("locale")
                    .selected_text(&self.locale)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.locale, "en".to_string(), "English (en)");
                        ui.selectable_value(&mut self.locale, "de".to_string(), "German (de)");
                        ui.selectable_value(&mut self.locale, "fr".to_string(), "French (fr)");
                    });
            });

            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
            ui.add_space(6.0);
        });

        egui::SidePanel::right("map_panel")
            .min_width(240.0)
            .show(ctx, |ui| {
                let map = self.chart.map();
                ui.heading("Map");
                ui.add_space(5.0);
                ui.label("Accented sites:");
                for key in &map.accented {
                    ui.label(format!("• {key}"));
                }
                ui.add_space(10.0);
                match &map.pointer {
                    Some((name, key)) => ui.strong(format!("Pointer on {name} ({key})")),
                    None => ui.weak("Pointer off chart"),
                };
                ui.add_space(10.0);
                ui.collapsing("Notifications", |ui| {
                    for event in map.events.iter().rev() {
                        ui.monospace(event);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                if self.chart.is_loaded() {
                    paint_chart(ui, &mut self.chart, &self.locale);
                    ui.add_space(8.0);
                    self.site_controls(ui);
                } else {
                    ui.label("Load a sample file to draw the hydrograph.");
                }
            });
        });
    }
}

/// Draw the chart, route the pointer into the widget, and show the tooltip.
fn paint_chart(ui: &mut egui::Ui, chart: &mut HydrographWidget<MapPanel>, locale: &str) {
    let cfg = chart.config().clone();
    let (response, painter) =
        ui.allocate_painter(Vec2::new(cfg.width as f32, cfg.height as f32), Sense::click());
    let rect = response.rect;

    // Pointer first, so this frame already shows the new hover state.
    if let Some(pos) = response.hover_pos() {
        let (x, y) = cfg.to_plot((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        if response.clicked() {
            if let Some(key) = chart.click(x, y) {
                log::info!("removed {key} from chart");
            }
        } else {
            chart.pointer_move(x, y);
        }
    } else if chart.hovered().is_some() {
        chart.pointer_leave();
    }

    let to_screen = |x: f64, y: f64| {
        let (cx, cy) = cfg.to_canvas(x, y);
        Pos2::new(rect.min.x + cx as f32, rect.min.y + cy as f32)
    };
    let font = FontId::proportional(LABEL_FONT);
    let axis = Stroke::new(1.0, Color32::BLACK);
    let (w, h) = (cfg.inner_width(), cfg.inner_height());

    painter.rect_filled(rect, 0.0, Color32::WHITE);

    for (idx, line) in chart.lines().iter().enumerate() {
        let (r, g, b) = office_rgb(idx);
        let stroke = match line.class {
            LineClass::Active => Stroke::new(3.0, Color32::from_rgb(r, g, b)),
            LineClass::Inactive => Stroke::new(1.0, Color32::from_rgba_unmultiplied(r, g, b, 180)),
        };
        let pts: Vec<Pos2> = line
            .points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| to_screen(x, y))
            .collect();
        painter.add(egui::Shape::line(pts, stroke));
    }

    // Time axis
    let scales = chart.scales();
    painter.line_segment([to_screen(0.0, h), to_screen(w, h)], axis);
    for t in scales.x.ticks(8) {
        let p = to_screen(scales.x.map(t), h);
        painter.line_segment([p, p + Vec2::new(0.0, 6.0)], axis);
        painter.text(
            p + Vec2::new(0.0, 8.0),
            Align2::CENTER_TOP,
            format_time_tick(t),
            font.clone(),
            Color32::BLACK,
        );
    }

    // Log value axis
    let num_locale = map_locale(locale);
    painter.line_segment([to_screen(0.0, 0.0), to_screen(0.0, h)], axis);
    let ticks = scales.y.ticks(10);
    let crowded = ticks.len() > 10;
    for v in ticks {
        let y = scales.y.map(v);
        if !y.is_finite() {
            continue;
        }
        let p = to_screen(0.0, y);
        painter.line_segment([p - Vec2::new(6.0, 0.0), p], axis);
        if label_log_tick(v, crowded) {
            painter.text(
                p - Vec2::new(8.0, 0.0),
                Align2::RIGHT_CENTER,
                format_log_tick(v, num_locale),
                font.clone(),
                Color32::BLACK,
            );
        }
    }

    // Focus marker and floating tooltip
    let focus = chart.focus();
    if !focus.is_off_canvas() {
        let p = to_screen(focus.x, focus.y);
        painter.circle_stroke(p, 4.0, axis);
        egui::Area::new(egui::Id::new("hydrograph_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(p + Vec2::new(12.0, -28.0))
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(&focus.label);
                });
            });
    }
}
