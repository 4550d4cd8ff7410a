// services/outage-tui/src/main.rs
//
// Terminal dashboard for provider outage reports
//
// Run with: cargo run --bin outage-tui -- --demo

use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use outagekit::config::{load_config, DashboardConfig};
use outagekit::{OutageBackend, OutageClient};
use ratatui::prelude::*;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod mock;
mod state;
mod ui;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "outage-tui")]
#[command(about = "Terminal dashboard for provider outage reports and competitor comparisons")]
#[command(version)]
struct Args {
    /// Serve generated data from memory instead of the analysis service
    #[arg(long, short)]
    demo: bool,

    /// Analysis service base URL (overrides config and OUTAGE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short)]
    config: Option<String>,

    /// Tracked provider
    #[arg(long)]
    provider: Option<String>,

    /// Redraw interval in milliseconds
    #[arg(long, default_value = "100")]
    refresh_ms: u64,

    /// Simulated backend latency in demo mode
    #[arg(long, default_value = "600")]
    demo_latency_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(provider) = &args.provider {
        config.provider = provider.clone();
    }

    let _log_guard = init_tracing(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let (backend, source): (Arc<dyn OutageBackend>, String) = if args.demo {
        let latency = Duration::from_millis(args.demo_latency_ms);
        (Arc::new(mock::demo_backend(latency)), "DEMO".to_string())
    } else {
        (Arc::new(OutageClient::from_config(&config)?), config.api_url.clone())
    };
    info!(source = %source, provider = %config.provider, "Starting outage dashboard");

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(runtime.handle().clone(), backend, &config, &source);
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.refresh_ms));
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

/// File logging only: stdout belongs to the terminal UI.
fn init_tracing(config: &DashboardConfig) -> Result<WorkerGuard> {
    let observability = &config.observability;
    std::fs::create_dir_all(&observability.log_dir)
        .with_context(|| format!("Failed to create log directory {}", observability.log_dir))?;

    let file_appender = tracing_appender::rolling::daily(&observability.log_dir, "outage-tui.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "outage_tui={level},outagekit={level}",
            level = observability.log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick_rate: Duration) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, &app.view_model()))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
