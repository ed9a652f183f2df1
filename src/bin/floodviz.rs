use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use floodviz::config::parse_id_list;
use floodviz::map::LoggingMap;
use floodviz::peak::{self, DV_URL_PREFIX, PEAK_URL_PREFIX};
use floodviz::source::{self, Client};
use floodviz::viz::{self, RenderOptions};
use floodviz::{ChartConfig, HydrographWidget, stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "floodviz",
    version,
    about = "Render, export & summarize streamflow hydrographs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load samples, replay pointer events and draw the chart.
    Render(RenderArgs),
    /// Save the displayed samples as CSV or JSON.
    Export(ExportArgs),
    /// Print per-site statistics of the displayed samples.
    Stats(DataArgs),
    /// Fetch the annual peak-flow series of a site.
    Peaks(PeaksArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Sample JSON: local path or http(s) URL. Overrides `data_path` from --config.
    #[arg(long)]
    data: Option<String>,
    /// Site keys separated by comma or semicolon (e.g., 01646500,01638500).
    /// Defaults to `display_ids` from --config, or every site in the data.
    #[arg(long)]
    display: Option<String>,
    /// Chart configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Outer width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Outer height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Hover at canvas position X,Y before drawing.
    #[arg(long, value_name = "X,Y")]
    hover: Option<String>,
    /// Click at canvas position X,Y (repeatable, applied in order before --hover).
    #[arg(long, value_name = "X,Y")]
    click: Vec<String>,
    /// Outline the hover cells.
    #[arg(long, default_value_t = false)]
    cells: bool,
    /// Number locale for axis labels (e.g., en, de, fr).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Hide the site legend.
    #[arg(long, default_value_t = false)]
    no_legend: bool,
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    data: DataArgs,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct PeaksArgs {
    /// USGS site number.
    #[arg(long)]
    site: String,
    /// Last date (YYYY-MM-DD) of the peak-flow record.
    #[arg(long)]
    end_date: String,
    /// Day whose daily value stands in for the current year.
    #[arg(long)]
    dv_date: Option<String>,
    /// Peak-flow service endpoint.
    #[arg(long, default_value = PEAK_URL_PREFIX)]
    url_prefix: String,
    /// Water services root for daily values.
    #[arg(long, default_value = DV_URL_PREFIX)]
    dv_url_prefix: String,
    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn fmt_time(ms: Option<i64>) -> String {
    ms.and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "NA".to_string())
}

fn parse_point(s: &str) -> Result<(f64, f64)> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid point {s:?}, expected X,Y"))?;
    let x = a.trim().parse::<f64>().with_context(|| format!("x in {s:?}"))?;
    let y = b.trim().parse::<f64>().with_context(|| format!("y in {s:?}"))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Peaks(args) => cmd_peaks(args),
    }
}

/// Merge --config with the command-line overrides.
fn chart_config(args: &DataArgs) -> Result<ChartConfig> {
    let mut cfg = match args.config.as_ref() {
        Some(path) => ChartConfig::from_json_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(data) = args.data.as_ref() {
        cfg.data_path = data.clone();
    }
    if let Some(display) = args.display.as_ref() {
        cfg.display_ids = parse_id_list(display);
    }
    if cfg.data_path.trim().is_empty() {
        bail!("no data given: pass --data or set data_path in --config");
    }
    Ok(cfg)
}

/// Build a loaded widget. With no display ids at all, every site is shown.
fn load_widget(cfg: ChartConfig) -> Result<HydrographWidget<LoggingMap>> {
    let dataset = source::load_dataset(&cfg.data_path)?;
    let show_all = cfg.display_ids.is_empty();
    let mut chart = HydrographWidget::new(cfg, LoggingMap);
    if show_all {
        let keys: Vec<String> = dataset.keys().map(str::to_string).collect();
        chart.load(dataset);
        chart.show(keys);
    } else {
        chart.load(dataset);
    }
    Ok(chart)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut cfg = chart_config(&args.data)?;
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    cfg.validate()?;

    let mut chart = load_widget(cfg)?;
    for spec in &args.click {
        let (cx, cy) = parse_point(spec)?;
        let (x, y) = chart.config().to_plot(cx, cy);
        match chart.click(x, y) {
            Some(key) => eprintln!("Clicked {key}: removed from chart"),
            None => eprintln!("Click at {spec} hit nothing"),
        }
    }
    if let Some(spec) = args.hover.as_ref() {
        let (cx, cy) = parse_point(spec)?;
        let (x, y) = chart.config().to_plot(cx, cy);
        chart.pointer_move(x, y);
        if let Some(sample) = chart.hovered() {
            eprintln!("Hovering {}", sample.focus_label());
        }
    }

    let options = RenderOptions {
        locale: args.locale.clone(),
        show_cells: args.cells,
        legend: !args.no_legend,
    };
    viz::render_widget(&chart, &args.out, &options)?;
    eprintln!(
        "Wrote chart of {} site(s) to {}",
        chart.display_ids().len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let chart = load_widget(chart_config(&args.data)?)?;
    let samples = chart.displayed_samples();
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&samples, path)?,
        "json" => storage::save_json(&samples, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", samples.len(), path.display());
    Ok(())
}

fn cmd_stats(args: DataArgs) -> Result<()> {
    let chart = load_widget(chart_config(&args)?)?;
    for s in stats::series_summary(&chart.displayed_samples()) {
        println!(
            "{} • {}  count={}  min={} max={} mean={} median={}  {} .. {}",
            s.key,
            s.name,
            s.count,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            fmt_time(s.first),
            fmt_time(s.last)
        );
    }
    Ok(())
}

fn cmd_peaks(args: PeaksArgs) -> Result<()> {
    let client = Client::new()?;
    let points = peak::fetch_peak_series(
        &client,
        &args.site,
        &args.end_date,
        args.dv_date.as_deref(),
        &args.url_prefix,
        &args.dv_url_prefix,
    )?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        for p in &points {
            println!("{}\t{}", p.label, fmt_opt(Some(p.value)));
        }
    }
    eprintln!("{} year(s) for site {}", points.len(), args.site);
    Ok(())
}
