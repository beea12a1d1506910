// Standalone replay tool for analyzing Battlesnake decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use treesnake::config::Config;
use treesnake::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay battlesnake_debug.jsonl --all");
    eprintln!("  replay battlesnake_debug.jsonl --turns 5,10,15 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn run(args: &[String]) -> Result<(), String> {
    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut turns: Option<Vec<i32>> = None;
    let mut all = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => all = true,
            "--verbose" => verbose = true,
            "--turns" => {
                i += 1;
                let value = args.get(i).ok_or("--turns requires a value")?;
                turns = Some(parse_turns(value)?);
            }
            "--config" => {
                i += 1;
                config_path = args.get(i).ok_or("--config requires a value")?.clone();
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let config = Config::from_file(&config_path)?;
    let engine = ReplayEngine::new(config, verbose);
    let entries = engine.load_log_file(log_file)?;

    let results = match (turns, all) {
        (Some(turns), _) => engine.replay_turns(&entries, &turns)?,
        (None, true) => engine.replay_all(&entries),
        (None, false) => return Err("Specify --all or --turns".to_string()),
    };

    engine.print_report(&results);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
