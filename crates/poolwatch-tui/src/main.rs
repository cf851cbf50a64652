use std::io;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

mod app;
mod events;
mod interval;
mod ui;

use app::{App, View};
use poolwatch_core::{
    ClassifiedSnapshot, Credentials, QueueSnapshot, QueueWatch, Settings, WorkPoolStore,
};
use poolwatch_poller::{
    Fetch, FetchQueues, PollEvent, QueueStatsFetcher, WorkPoolFetcher, run_queues, run_work_pool,
};

#[derive(Parser, Debug)]
#[command(name = "poolwatch")]
#[command(about = "Terminal monitor for a DynamoDB work pool and its SQS queues")]
struct Args {
    /// DynamoDB work-pool table to scan
    #[arg(short, long)]
    table: Option<String>,

    /// SQS queue name to watch (repeatable; default watches every queue)
    #[arg(short, long = "queue")]
    queues: Vec<String>,

    /// AWS region
    #[arg(short, long)]
    region: Option<String>,

    /// AWS profile to authenticate with (overrides environment credentials)
    #[arg(short, long)]
    profile: Option<String>,

    /// Work-pool poll interval ("5s", "1m", or raw seconds; minimum 5s)
    #[arg(long, default_value = "5s")]
    interval: String,

    /// Queue-metrics poll interval (minimum 10s)
    #[arg(long, default_value = "30s")]
    queue_interval: String,

    /// Start on the queues view
    #[arg(long)]
    queues_view: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The terminal owns stdout; logs go to stderr and are only visible when
    // redirected (RUST_LOG=debug poolwatch 2>poolwatch.log).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut settings = Settings::default();
    if let Some(table) = args.table.clone() {
        settings.table = table;
    }
    if let Some(region) = args.region.clone() {
        settings.region = region;
    }
    settings.queues = args.queues.clone();
    settings.pool_interval = interval::parse_interval(&args.interval)
        .ok_or_else(|| anyhow!("cannot parse --interval: {}", args.interval))?;
    settings.queue_interval = interval::parse_interval(&args.queue_interval)
        .ok_or_else(|| anyhow!("cannot parse --queue-interval: {}", args.queue_interval))?;
    let settings = settings.clamp_intervals();

    tracing::info!(
        table = %settings.table,
        region = %settings.region,
        queues = settings.queues.len(),
        "starting poolwatch"
    );

    // Credentials are resolved exactly once; every client shares the result.
    let credentials = match &args.profile {
        Some(name) => Credentials::Profile { name: name.clone() },
        None => Credentials::from_env(),
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let sdk = runtime.block_on(credentials.resolve(&settings.region));

    let pool_fetcher = WorkPoolFetcher::new(WorkPoolStore::new(&sdk, settings.table.clone()));
    let queue_fetcher = QueueStatsFetcher::new(
        QueueWatch::new(&sdk, settings.queues.clone()),
        settings.queues.len(),
    );

    let mut app = App::new(
        if args.queues_view { View::Queues } else { View::WorkPool },
        pool_fetcher.source().to_string(),
        queue_fetcher.source().to_string(),
    );

    let (pool_tx, mut pool_rx) = mpsc::channel(8);
    let (queue_tx, mut queue_rx) = mpsc::channel(8);
    let (stop_tx, stop_rx) = watch::channel(false);

    runtime.spawn(run_work_pool(
        settings.pool_interval,
        pool_fetcher,
        pool_tx,
        stop_rx.clone(),
    ));
    runtime.spawn(run_queues(
        settings.queue_interval,
        queue_fetcher,
        queue_tx,
        stop_rx,
    ));

    let result = run_tui(&mut app, &mut pool_rx, &mut queue_rx);

    // Cooperative shutdown: flip the stop signal, then give an in-flight
    // tick a moment to finish before the runtime goes away.
    let _ = stop_tx.send(true);
    runtime.shutdown_timeout(Duration::from_secs(2));

    result
}

/// Set up the terminal, run the event loop, and restore the terminal even
/// when the loop errors.
fn run_tui(
    app: &mut App,
    pool_rx: &mut mpsc::Receiver<PollEvent<ClassifiedSnapshot>>,
    queue_rx: &mut mpsc::Receiver<PollEvent<QueueSnapshot>>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, pool_rx, queue_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    pool_rx: &mut mpsc::Receiver<PollEvent<ClassifiedSnapshot>>,
    queue_rx: &mut mpsc::Receiver<PollEvent<QueueSnapshot>>,
) -> Result<()> {
    while app.running {
        // Drain whatever the pollers produced since the last frame.
        while let Ok(event) = pool_rx.try_recv() {
            app.apply_pool_event(event);
        }
        while let Ok(event) = queue_rx.try_recv() {
            app.apply_queue_event(event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    events::handle_key_event(app, key);
                }
            }
        }
    }

    Ok(())
}
