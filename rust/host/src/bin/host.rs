//! Runs one hosted game between two AIs and prints its events as JSON lines.
//!
//! Usage: cargo run -p ronda_host --bin ronda-host -- [--seed N] [--ai NAME]

use ronda_engine::events::GameEvent;
use ronda_host::{
    EventBus, HostEvent, HostSettings, LogFormat, SessionConfig, SessionManager,
};
use std::path::PathBuf;

struct Args {
    settings: Option<PathBuf>,
    seed: Option<u64>,
    ai: Option<String>,
    log_format: LogFormat,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        settings: None,
        seed: None,
        ai: None,
        log_format: LogFormat::Text,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--settings" | "-s" => {
                let v = it.next().ok_or("--settings requires a value")?;
                args.settings = Some(PathBuf::from(v));
            }
            "--seed" => {
                let v = it.next().ok_or("--seed requires a value")?;
                args.seed = Some(v.parse().map_err(|_| format!("invalid seed: {}", v))?);
            }
            "--ai" => {
                args.ai = Some(it.next().ok_or("--ai requires a value")?);
            }
            "--log-json" => args.log_format = LogFormat::Json,
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(2);
        }
    };
    ronda_host::init_logging(args.log_format);

    let settings = match &args.settings {
        Some(path) => HostSettings::load(path)?,
        None => HostSettings::default(),
    };
    tracing::info!(?settings, "starting host");

    let ai = args.ai.unwrap_or_else(|| settings.default_ai.clone());
    let manager = SessionManager::with_settings(EventBus::new(), settings)?;
    let config = SessionConfig {
        seed: args.seed,
        seats: [Some(ai.clone()), Some(ai)],
    };
    let (id, mut events) = manager.create_subscribed(config)?;

    loop {
        tokio::select! {
            event = events.receiver.recv() => {
                let Some(event) = event else { break };
                println!("{}", serde_json::to_string(&event)?);
                match event {
                    HostEvent::Game { event: GameEvent::GameOver { .. }, .. } => break,
                    HostEvent::SessionClosed { .. } => break,
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    drop(events);
    manager.shutdown_all().await;
    tracing::info!(session_id = %id, "host stopped");
    Ok(())
}

fn print_help() {
    println!("Ronda host");
    println!();
    println!("Usage: ronda-host [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --settings, -s <FILE>   Host settings TOML file");
    println!("  --seed <N>              Game seed (default: random)");
    println!("  --ai <NAME>             AI for both seats (default: settings default_ai)");
    println!("  --log-json              Log as JSON on stderr");
    println!("  --help                  Show this help message");
}
