use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossbeam_channel::Sender;
use tracing::{error, info};

use stkeymap::config::KeymapConfig;
use stkeymap::keymap::{KeyAction, ShortcutAction, ShortcutLatch};
use stkeymap::replay::{HostEvent, Replay, parse_event_line};

struct Args {
    script: Option<String>,
    config: String,
}

fn read_parameters() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args {
        script: None,
        config: "Config.toml".to_string(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!(
                    "Usage: stkeymap [script] [--config PATH]\n\n\
                     Replays host key events (stdin when no script is given) and\n\
                     prints the scancodes sent to the emulated keyboard."
                );
                std::process::exit(0);
            }
            "--config" | "-c" => {
                parsed.config = args.next().context("--config needs a path")?;
            }
            _ if arg.starts_with('-') => bail!("Illegal parameter: {}", arg),
            _ => parsed.script = Some(arg),
        }
    }

    Ok(parsed)
}

/// Reads the script on its own thread so the frame loop keeps ticking
/// while input is idle.
fn spawn_reader(script: Option<String>, tx: Sender<HostEvent>) -> Result<()> {
    let reader: Box<dyn BufRead + Send> = match script {
        Some(path) => Box::new(BufReader::new(
            File::open(&path).with_context(|| format!("opening script {}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    thread::Builder::new()
        .name("event_reader".to_string())
        .spawn(move || {
            for (index, line) in reader.lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to read script: {}", e);
                        break;
                    }
                };
                match parse_event_line(&line) {
                    Ok(Some(event)) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => error!("line {}: {:#}", index + 1, e),
                }
            }
        })
        .map_err(|e| anyhow::anyhow!("Failed to start reader thread: {}", e))?;

    Ok(())
}

/// Prints one step of the frame loop. Stops on the quit shortcut.
fn report(actions: &[KeyAction], latch: Option<ShortcutLatch>) -> ControlFlow<()> {
    for action in actions {
        println!("{}", action);
    }

    if let Some(latch) = latch {
        match latch.action() {
            Some(ShortcutAction::Quit) => {
                println!("shortcut Quit");
                return ControlFlow::Break(());
            }
            Some(action) => println!("shortcut {}", action.as_str()),
            None => info!("No action bound to shortcut {:?}", latch.key),
        }
    }
    ControlFlow::Continue(())
}

fn main() -> Result<()> {
    let args = read_parameters()?;

    let config = KeymapConfig::load_or_create(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config))?;
    tracing_subscriber::fmt()
        .with_max_level(config.level_filter())
        .with_writer(io::stderr)
        .init();

    let (tx, rx) = crossbeam_channel::unbounded();
    spawn_reader(args.script, tx)?;

    let ticker = crossbeam_channel::tick(Duration::from_millis(config.frame_interval_ms));
    let mut replay = Replay::new(&config);
    replay.run_frames(&rx, &ticker, report);

    if let Some(offset) = replay.keymap().scancode_offset() {
        info!("Host scancode offset was {}", offset);
    }
    Ok(())
}
