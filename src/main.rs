use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use pulse_tui::app::write_export;
use pulse_tui::source::{Fetch, HttpFetcher};
use pulse_tui::ui::{self, Theme};
use pulse_tui::{
    events, App, ConfigOverrides, DashboardConfig, DataSource, Endpoint, FileSource,
    GraphFetcher, GraphiteClient, HttpSource,
};

/// How often the UI redraws and checks timers.
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(about = "Terminal dashboard for a JSON stats endpoint")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stats endpoint URL; may embed user:pass@ credentials
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read stats from a JSON file instead of polling a URL
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Graphite base URL for hover graphs
    #[arg(short, long)]
    graphite_url: Option<String>,

    /// Hover graph lookback in seconds
    #[arg(short, long)]
    period: Option<u64>,

    /// Delay between polls in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Hover delay before a graph opens, in milliseconds
    #[arg(long)]
    hover_delay: Option<u64>,

    /// Fetch once, export the board to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            stats_url: self.url.clone(),
            stats_file: self.file.clone(),
            graphite_url: self.graphite_url.clone(),
            graph_period_secs: self.period,
            poll_interval_ms: self.interval,
            hover_delay_ms: self.hover_delay,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref(), args.export.is_some())?;

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    config.apply(args.overrides());
    config.validate()?;

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_once(&rt, &config, export_path);
    }

    let _guard = rt.enter();

    let (source, refresh_interval) = open_source(&config)?;
    info!(source = %source.description(), "starting dashboard");

    let mut app = App::new(source, config.renderer(), config.board())
        .with_hover_delay(config.hover_delay())
        .with_theme(Theme::auto_detect());

    if let Some(ref url) = config.graphite_url {
        let client = GraphiteClient::new(url.as_str(), config.graph_period_secs);
        app = app.with_graphs(GraphFetcher::new(client, rt.handle().clone()));
    }

    run_tui(app, refresh_interval)
}

/// Logs go to a file so they never interleave with the TUI. Export mode may
/// log to stderr instead.
fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .compact()
                .init();
        }
        None if to_stderr => {
            fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .compact()
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Open the configured source. Must be called inside the runtime.
///
/// Returns the source and how often the UI should poll it.
fn open_source(config: &DashboardConfig) -> Result<(Box<dyn DataSource>, Duration)> {
    if let Some(ref url) = config.stats_url {
        let endpoint = Endpoint::parse(url);
        let source = HttpSource::connect(endpoint, config.poll_interval(), config.request_timeout())?;
        // The poller runs on its own schedule; the UI only drains its channel.
        return Ok((Box::new(source), TICK));
    }
    if let Some(ref path) = config.stats_file {
        return Ok((Box::new(FileSource::new(path)), config.poll_interval()));
    }
    bail!("no stats source configured")
}

/// Run the TUI until the user quits
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(TICK)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, Instant::now()),
                Event::Resize(_, _) => {
                    // Tile areas are recomputed on the next draw
                    app.close_overlay();
                }
                _ => {}
            }
        }

        app.tick(Instant::now());

        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Fetch one snapshot, render it and write the board to `export_path`.
fn export_once(
    rt: &tokio::runtime::Runtime,
    config: &DashboardConfig,
    export_path: &Path,
) -> Result<()> {
    let (request_id, stats) = if let Some(ref url) = config.stats_url {
        let fetcher = HttpFetcher::new(Endpoint::parse(url), config.request_timeout())?;
        (0, rt.block_on(fetcher.fetch())?)
    } else if let Some(ref path) = config.stats_file {
        let mut source = FileSource::new(path);
        match source.poll() {
            Some(polled) => (polled.request_id, polled.stats),
            None => bail!(
                "failed to read {}: {}",
                path.display(),
                source.error().unwrap_or_else(|| "no data".to_string())
            ),
        }
    } else {
        bail!("no stats source configured");
    };

    let mut board = config.board();
    config.renderer().render(&stats, &mut board);
    write_export(&board, Some(request_id), export_path)?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
