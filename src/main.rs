use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use systemboard::console::{element_summary, run_console};
use systemboard::runtime::lock;
use systemboard::source::UnavailableFeed;
use systemboard::{Board, ElementId, SimConfig, Simulator, SourceError};

const FEED_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "systemboard")]
#[command(about = "Runs a teaching-board circuit in real time")]
struct Cli {
    /// Circuit file (JSON)
    circuit: PathBuf,

    /// Simulation settings (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Show the live terminal monitor
    #[arg(long)]
    console: bool,

    /// Seed for the random element
    #[arg(long)]
    seed: Option<u64>,

    /// Write the circuit back out when the run ends
    #[arg(long)]
    save: Option<PathBuf>,
}

fn init_logging(console: bool) {
    // The monitor owns the terminal; keep logs quiet unless asked for
    let default_level = if console { "warn" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let console = cli.console || config.console.enabled;
    init_logging(console);

    let board = match Board::load_json(&cli.circuit, &config) {
        Ok(board) => board,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "{} elements, {} wires",
        board.elements().len(),
        board.wires().links().len()
    );

    // No capture devices from the command line; sound and webcam sensors
    // report a constant level
    let feeds: Vec<ElementId> = board
        .elements()
        .iter()
        .map(|element| element.id())
        .filter(|id| board.source_node(*id).is_some())
        .collect();

    let mut simulator = Simulator::new(board, &config);
    for id in feeds {
        let feed = UnavailableFeed::new(SourceError::Unavailable("no capture device".to_string()));
        if let Err(e) = simulator.attach_feed(id, Box::new(feed), FEED_INTERVAL) {
            error!("{}", e);
        }
    }
    let monitor = if console {
        let board = simulator.board();
        let control = simulator.control();
        let console_config = config.console.clone();
        Some(thread::spawn(move || {
            if let Err(e) = run_console(board, control.clone(), console_config) {
                eprintln!("Console error: {}", e);
            }
            control.stop();
        }))
    } else {
        None
    };

    let ticks = simulator.run(cli.ticks).await;

    if let Some(handle) = monitor {
        if handle.join().is_err() {
            eprintln!("Console thread panicked");
        }
    }

    let board = simulator.board();
    let board = lock(&board);
    if !console {
        println!("After {} ticks:", ticks);
        for element in board.elements() {
            println!("  {}", element_summary(element));
        }
    }

    if let Some(path) = &cli.save {
        if let Err(e) = board.save_json(path) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
