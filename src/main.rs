//! # Crawler Main Entry Point
//!
//! Parses the command line, sets up logging and runs either the interactive terminal
//! game or a headless replay.

use clap::Parser;
use crawler::{
    ending_banner, topology_map, CrawlerResult, GameState, GenerationConfig, InputHandler,
    PlayerClass, TerminalDisplay,
};
use log::{error, info};
use std::io::{self, BufRead};
use std::time::{SystemTime, UNIX_EPOCH};

/// Command line arguments for the dungeon crawler.
#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "A turn-based terminal dungeon crawler in a procedurally carved maze")]
#[command(version)]
struct Args {
    /// Random seed for map generation and every roll after it
    #[arg(short, long)]
    seed: Option<u64>,

    /// Side length of the square map (even, at least 4)
    #[arg(long, default_value_t = crawler::config::DEFAULT_MAP_SIZE)]
    size: u32,

    /// Character class
    #[arg(short, long, value_enum, default_value_t = PlayerClass::Warrior)]
    class: PlayerClass,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Run headless: comma-separated commands, one JSON event per output line
    #[arg(long)]
    replay: Option<String>,

    /// Print the generated map and exit
    #[arg(long)]
    dump_map: bool,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(err) = run(&args) {
        error!("Fatal: {}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Initializes env_logger on stderr so log lines never land on the game screen.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: &Args) -> CrawlerResult<()> {
    let seed = args.seed.unwrap_or_else(time_seed);
    let config = GenerationConfig::new(seed).with_size(args.size);
    info!("Starting crawler v{} with seed {}", crawler::VERSION, seed);

    let mut state = GameState::new(config, args.class)?;

    if args.dump_map {
        for line in topology_map(&state.grid) {
            println!("{}", line);
        }
        return Ok(());
    }

    match &args.replay {
        Some(script) => run_replay(&mut state, script),
        None => run_interactive(&mut state),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(42)
}

/// Plays a scripted command list and prints every event as JSON.
///
/// Rejected commands are reported inline and skipped, like the interactive loop does.
fn run_replay(state: &mut GameState, script: &str) -> CrawlerResult<()> {
    let handler = InputHandler::new();

    for command in script.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if state.is_game_ended() {
            break;
        }

        let result = handler
            .parse_line(command, state.in_battle())
            .and_then(|input| state.execute(input));

        match result {
            Ok(events) => {
                for event in events {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            Err(err) => {
                let rejected = serde_json::json!({ "rejected": command, "reason": err.to_string() });
                println!("{}", rejected);
            }
        }
    }

    Ok(())
}

/// Runs the interactive game, restoring the terminal however the loop ends.
fn run_interactive(state: &mut GameState) -> CrawlerResult<()> {
    let mut display = TerminalDisplay::stdout()?;
    let result = interactive_loop(state, &mut display);
    display.restore()?;
    result?;

    if let Some(banner) = ending_banner(state) {
        println!("{}", banner);
    }
    Ok(())
}

/// Draw, read a line, execute, repeat.
fn interactive_loop(state: &mut GameState, display: &mut TerminalDisplay<io::Stdout>) -> CrawlerResult<()> {
    let handler = InputHandler::new();
    let stdin = io::stdin();
    let mut notice: Option<String> = None;

    loop {
        display.render(state, notice.take().as_deref(), "Enter command: ")?;
        if state.is_game_ended() {
            return Ok(());
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        if let Err(err) = handler
            .parse_line(&line, state.in_battle())
            .and_then(|input| state.execute(input))
        {
            notice = Some(err.to_string());
        }
    }
}
