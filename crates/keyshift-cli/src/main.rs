mod script;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, Receiver};
use keyshift_core::{load_config, presets, Dispatcher, HidReport, OutputSink};
use script::ScriptReader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replays key event scripts through a keyshift keymap", long_about = None)]
struct Args {
    /// Keymap JSON file (defaults to the built-in kwf keymap)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the keymap's tap timeout
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Only print the final report
    #[arg(short, long)]
    quiet: bool,

    /// Event script, `<ms> <down|up> <key>` per line; `-` or nothing reads stdin
    script: Option<PathBuf>,
}

/// Feeds lines from `reader` into a channel from a background thread. The
/// channel closes at end of input.
fn spawn_reader(reader: Box<dyn BufRead + Send>) -> Receiver<io::Result<String>> {
    let (tx, rx) = bounded(64);
    thread::spawn(move || {
        for line in reader.lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn open_script(path: Option<&PathBuf>) -> Result<Box<dyn BufRead + Send>> {
    match path {
        Some(p) if p.to_str() != Some("-") => {
            let file = File::open(p)
                .with_context(|| format!("failed to open script {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            info!("Using built-in kwf keymap.");
            presets::kwf()
        }
    };
    if let Some(ms) = args.timeout_ms {
        config.tap_timeout_ms = ms;
        config.validate()?;
    }

    let mut dispatcher = Dispatcher::new(config);
    info!("Tap timeout {:?}.", dispatcher.tap_timeout());
    let mut report = HidReport::new();
    let mut script = ScriptReader::new();
    let lines = spawn_reader(open_script(args.script.as_ref())?);

    let t0 = Instant::now();
    let mut count = 0usize;
    for line in lines {
        let line = line.context("failed to read script")?;
        let Some(ev) = script.feed(&line)? else {
            continue;
        };

        let event = script.stamp(t0, &ev)?;
        let actions = dispatcher.on_event(event);
        for action in &actions {
            report.emit(*action);
        }
        count += 1;

        if !args.quiet {
            let rendered: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            println!(
                "{:>6}ms {:<4} {:<10} -> {}",
                ev.at_ms,
                if ev.pressed { "down" } else { "up" },
                ev.key.to_string(),
                rendered.join(" ")
            );
        }
    }

    let bytes: Vec<String> = report.to_bytes().iter().map(|b| format!("{:02X}", b)).collect();
    println!("{} events, final report [{}]", count, bytes.join(" "));

    if !report.is_clear() {
        let stuck: Vec<String> = report.pressed_keys().map(|k| k.to_string()).collect();
        warn!(
            "Keys still down at end of script: modifiers {:?}, keys [{}]",
            report.modifiers,
            stuck.join(", ")
        );
    }
    if !dispatcher.modifiers().is_settled() {
        warn!(
            "Modifier override still in effect: held {:?}, live {:?}",
            dispatcher.modifiers().held(),
            dispatcher.modifiers().live()
        );
    }

    Ok(())
}
