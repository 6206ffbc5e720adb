#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the wordgrid product tables and tile game.

mod repl;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wordgrid_app::{
    config::CONFIG_FILE, present_table, AppConfig, AssetLoader, FsAssetSource, GameSession,
    TableSession,
};
use wordgrid_core::{Viewport, CELL_HEIGHT, CELL_WIDTH, RECONCILE_INTERVAL};
use wordgrid_rendering::{text::render_cells, RecordingSurface};
use wordgrid_system_product_table::{preview, Preview, TableRequest, TOO_LARGE_TO_PREVIEW};

/// Multiplication tables and a single-row tile game.
#[derive(Debug, Parser)]
#[command(name = "wordgrid", version)]
struct Cli {
    /// Configuration file
    #[arg(long, value_name = "PATH", default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints a bounded product table with heat coloring
    Table {
        #[command(flatten)]
        bounds: Bounds,
        /// Emit an HTML table instead of text
        #[arg(long)]
        html: bool,
    },
    /// Realizes only the cells of a large product table visible through a viewport
    Window {
        #[command(flatten)]
        bounds: Bounds,
        /// Viewport height in pixels
        #[arg(long, default_value_t = f64::from(CELL_HEIGHT) * 10.0)]
        height: f64,
        /// Viewport width in pixels
        #[arg(long, default_value_t = f64::from(CELL_WIDTH) * 10.0)]
        width: f64,
        /// Scroll offset applied after attaching, as TOP:LEFT; repeatable
        #[arg(long = "scroll", value_name = "TOP:LEFT", value_parser = parse_scroll)]
        scrolls: Vec<(f64, f64)>,
    },
    /// Plays the tile game on standard input
    Tiles {
        /// Shuffle seed, overriding the configured one
        #[arg(long)]
        seed: Option<u64>,
        /// Directory holding the game data, overriding the configured one
        #[arg(long, value_name = "DIR")]
        assets: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct Bounds {
    /// First column multiplier
    #[arg(allow_negative_numbers = true)]
    x_start: i64,
    /// Last column multiplier
    #[arg(allow_negative_numbers = true)]
    x_end: i64,
    /// First row multiplier
    #[arg(allow_negative_numbers = true)]
    y_start: i64,
    /// Last row multiplier
    #[arg(allow_negative_numbers = true)]
    y_end: i64,
}

fn parse_scroll(value: &str) -> Result<(f64, f64), String> {
    let (top, left) = value
        .split_once(':')
        .ok_or_else(|| format!("expected TOP:LEFT, got `{value}`"))?;
    let top = top.trim().parse().map_err(|_| format!("invalid top `{top}`"))?;
    let left = left
        .trim()
        .parse()
        .map_err(|_| format!("invalid left `{left}`"))?;
    Ok((top, left))
}

/// Entry point for the wordgrid command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match cli.command {
        Command::Table { bounds, html } => print_table(&config, &bounds, html, &mut out)?,
        Command::Window {
            bounds,
            height,
            width,
            scrolls,
        } => print_window(&config, &bounds, height, width, &scrolls, &mut out)?,
        Command::Tiles { seed, assets } => {
            let root = assets.unwrap_or_else(|| config.tiles.asset_root.clone());
            let seed = seed.or(config.tiles.seed).unwrap_or_else(rand::random);
            info!(root = %root.display(), seed, "starting tile game");
            let mut loader = AssetLoader::new(FsAssetSource::new(root));
            let mut session = GameSession::new(RecordingSurface::new());
            let stdin = io::stdin();
            repl::run(&mut session, &mut loader, seed, stdin.lock(), &mut out)?;
        }
    }
    out.flush().context("failed to flush output")
}

/// Console logging filtered through `RUST_LOG`, warnings only by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_line_number(true);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init();
}

fn print_table(config: &AppConfig, bounds: &Bounds, html: bool, out: &mut impl Write) -> Result<()> {
    let request = TableRequest::new(bounds.x_start, bounds.x_end, bounds.y_start, bounds.y_end);
    let limits = config.table.limits();
    match preview(&request, &limits).context("invalid table request")? {
        Preview::TooLarge => writeln!(out, "{TOO_LARGE_TO_PREVIEW}")?,
        Preview::Table(table) => {
            let presentation = present_table(&table);
            if html {
                writeln!(out, "<h2>{}</h2>", request.label())?;
                write!(out, "{}", presentation.to_html())?;
            } else {
                write!(out, "{}", presentation.to_text())?;
            }
        }
    }
    Ok(())
}

fn print_window(
    config: &AppConfig,
    bounds: &Bounds,
    height: f64,
    width: f64,
    scrolls: &[(f64, f64)],
    out: &mut impl Write,
) -> Result<()> {
    let range = TableRequest::new(bounds.x_start, bounds.x_end, bounds.y_start, bounds.y_end)
        .validate(&config.table.limits())
        .context("invalid table request")?;
    let mut session = TableSession::new(config.table.windowing(), RecordingSurface::new());
    session.attach(range, Viewport::new(0.0, 0.0, height, width), Duration::ZERO)?;

    let mut at = Duration::ZERO;
    for &(top, left) in scrolls {
        at += RECONCILE_INTERVAL;
        session.scroll(Viewport::new(top, left, height, width), at)?;
    }

    let surface = session.surface();
    write!(out, "{}", render_cells(surface.nodes()))?;
    if let Some(size) = surface.content_size() {
        writeln!(
            out,
            "{} of {} cells realized, content {}x{} px",
            surface.node_count(),
            range.columns().max(1).saturating_mul(range.rows().max(1)),
            size.width,
            size.height
        )?;
    }
    Ok(())
}
