use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use tokio::task::JoinHandle;
use tracing::info;

use procpulse::app::{App, RefreshOutcome};
use procpulse::config::{self, Config, load_config, load_config_from_path};
use procpulse::event::{Event, EventHandler};
use procpulse::logging;
use procpulse::system::snapshot::SystemSnapshot;
use procpulse::system::{Collector, ProcContext, SampleError};
use procpulse::ui;

type PendingRefresh = JoinHandle<Result<SystemSnapshot, SampleError>>;

#[derive(Parser)]
#[command(
    name = "procpulse",
    about = "Terminal process monitor that samples /proc directly"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// CPU sampling window in milliseconds (0 compares back-to-back reads)
    #[arg(long)]
    sample_interval: Option<u64>,

    /// Alternate proc filesystem root
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Write JSON-lines logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print N snapshots as JSON lines and exit without starting the UI.
    #[arg(long, value_name = "N")]
    dump: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path, &config.logging.level)?;
    }

    let ctx = ProcContext::from_host(config.paths.clone())
        .ok_or_else(|| eyre!("could not determine the kernel clock tick rate"))?;
    info!(
        proc_root = %config.paths.proc_root.display(),
        ticks_per_second = ctx.ticks_per_second,
        "sampling context ready"
    );
    let collector = Collector::new(ctx, config.sampling.policy());

    if let Some(count) = cli.dump {
        return run_dump(collector, count).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config, collector).await;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    collector: Collector,
) -> Result<()> {
    let mut app = App::new(config, collector);
    let mut events = EventHandler::new(app.refresh_rate);
    let mut pending: Option<PendingRefresh> = None;

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        // At most one refresh in flight; ticks that land meanwhile coalesce.
        if pending.is_none() && app.take_refresh_request() {
            let collector = app.collector.clone();
            pending = Some(tokio::task::spawn_blocking(move || collector.refresh()));
        }

        let mut should_draw = false;
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                match event {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            let action = app.map_key(key);
                            app.dispatch(action);
                            should_draw = true;
                        }
                    }
                    Event::Tick => app.request_refresh(),
                    Event::Resize => should_draw = true,
                }
            }
            joined = join_refresh(&mut pending) => {
                pending = None;
                app.finish_refresh(joined);
                should_draw = true;
            }
        }

        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    Ok(())
}

async fn join_refresh(pending: &mut Option<PendingRefresh>) -> RefreshOutcome {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Headless mode: one JSON object per line on stdout.
async fn run_dump(collector: Collector, count: usize) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut out = std::io::stdout().lock();
        for _ in 0..count {
            let snapshot = collector.refresh()?;
            serde_json::to_writer(&mut out, &snapshot)?;
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    })
    .await?
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(interval) = cli.sample_interval {
        config.sampling.interval_ms = interval;
    }
    if let Some(ref root) = cli.proc_root {
        config.paths.proc_root = root.clone();
    }

    config
}
