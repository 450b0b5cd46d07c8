// File: crates/demo/src/main.rs
// Summary: Demo loads the case table and boundaries, renders the dashboard, then replays
//          a bar click and a metric switch and renders again.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use covid_core::{Dashboard, DashboardConfig, Metric, MonthKey};
use tracing::info;

/// Render the linked COVID-19 bar chart and world map to PNG files
#[derive(Parser, Debug)]
#[command(name = "covid-demo")]
struct Args {
    /// JSON dashboard config; every field is optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Case/death CSV (overrides the config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Country boundaries GeoJSON (overrides the config)
    #[arg(long)]
    geo: Option<PathBuf>,

    /// Initially selected month, YYYY-MM
    #[arg(long)]
    month: Option<MonthKey>,

    /// Initially selected metric (new_cases or new_deaths)
    #[arg(long)]
    metric: Option<Metric>,

    /// Month whose bar is clicked in the replay, YYYY-MM (defaults to the peak month)
    #[arg(long)]
    click: Option<MonthKey>,

    /// Theme preset: light or dark
    #[arg(long)]
    theme: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "target/out")]
    out: PathBuf,

    /// Print the effective config as JSON and exit
    #[arg(long, default_value = "false")]
    print_config: bool,
}

fn build_config(args: &Args) -> Result<DashboardConfig> {
    let mut cfg = match &args.config {
        Some(path) => DashboardConfig::load(path).with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(p) = &args.data {
        cfg.data_path = p.clone();
    }
    if let Some(p) = &args.geo {
        cfg.geo_path = p.clone();
    }
    if let Some(m) = args.month {
        cfg.initial_month = m;
    }
    if let Some(m) = args.metric {
        cfg.initial_metric = m;
    }
    if let Some(t) = &args.theme {
        cfg.theme = t.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = build_config(&args)?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    info!(
        data = %cfg.data_path.display(),
        geo = %cfg.geo_path.display(),
        month = %cfg.initial_month,
        metric = %cfg.initial_metric,
        out = %args.out.display(),
        "Starting covid-demo"
    );

    let mut now = 0u64;
    let mut dash = Dashboard::load(&cfg, now).context("failed to build dashboard")?;
    now = dash.bars().settled_at();
    dash.render_to_dir(args.out.join("initial"), now)?;

    // Click the requested bar, or the tallest one
    let target = args.click.or_else(|| {
        let metric = dash.bars().metric();
        dash.bars()
            .data()
            .iter()
            .max_by(|a, b| a.value(metric).total_cmp(&b.value(metric)))
            .map(|a| a.month)
    });
    if let Some(month) = target {
        let bar = dash.bars().frame(now).into_iter().find(|b| b.month == month);
        match bar {
            Some(bar) if bar.rect.height() > 0.0 => {
                let x = (bar.rect.left + bar.rect.right) / 2.0;
                let y = (bar.rect.top + bar.rect.bottom) / 2.0;
                now += 1_000;
                dash.pointer_move(x, y, now);
                dash.click(x, y, now);
                dash.render_to_dir(args.out.join("clicked"), now)?;
            }
            _ => tracing::warn!(%month, "no visible bar for month; skipping click"),
        }
    }

    let other = match dash.context().metric() {
        Metric::Cases => Metric::Deaths,
        Metric::Deaths => Metric::Cases,
    };
    now += 1_000;
    dash.pointer_leave();
    dash.select_metric(other, now);
    // Halfway through the bar transition, then settled
    dash.render_to_dir(args.out.join("switching"), now + 400)?;
    let written = dash.render_to_dir(args.out.join("switched"), dash.bars().settled_at())?;

    for p in &written {
        println!("Wrote {}", p.display());
    }
    println!(
        "Selection: {} / {}",
        dash.context().month(),
        dash.context().metric().label()
    );
    Ok(())
}
