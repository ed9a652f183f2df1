//! floodviz
//!
//! An interactive hydrograph: streamflow time series of several gauge sites on
//! a shared time axis and a logarithmic discharge axis, kept in sync with a map
//! of the same sites. Pairs with the `floodviz` CLI and the `floodviz-gui` viewer.
//!
//! ### Features
//! - Load sample records from a JSON file or URL (string or numeric fields)
//! - Show, hide and replace the displayed sites; the map is told about new ones
//! - Nearest-sample hover via a Voronoi partition of the plot
//! - Click a line to remove its site from the chart
//! - Render the current state to SVG/PNG, export CSV/JSON, summarize per site
//! - Annual peak-flow series from the USGS NWIS services
//!
//! ### Example
//! ```no_run
//! use floodviz::{ChartConfig, HydrographWidget};
//! use floodviz::map::RecordingMap;
//!
//! let cfg = ChartConfig {
//!     data_path: "data/hydrograph.json".into(),
//!     display_ids: vec!["01646500".into(), "01638500".into()],
//!     ..Default::default()
//! };
//! let mut chart = HydrographWidget::new(cfg, RecordingMap::new());
//! chart.init();
//! chart.pointer_move(120.0, 80.0);
//! floodviz::viz::render_widget(&chart, "hydrograph.svg", &Default::default())?;
//! println!("{:#?}", chart.map().calls());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod hit;
pub mod map;
pub mod models;
pub mod peak;
pub mod scale;
pub mod selection;
pub mod source;
pub mod stats;
pub mod storage;
pub mod viz;
pub mod widget;

pub use config::ChartConfig;
pub use error::FloodvizError;
pub use hit::HitSurface;
pub use map::MapCollaborator;
pub use models::{Dataset, Sample};
pub use widget::HydrographWidget;
