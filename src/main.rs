//! serline - line editing for serial terminal sessions
//!
//! serline turns a raw byte stream, as it arrives from a UART or any other
//! serial link, into finished lines while echoing a minimal VT100 editing
//! experience back to the terminal.
//!
//! # Features
//!
//! - **In-place editing**: insert, backspace and delete anywhere in the line
//! - **Cursor keys**: left/right, Home/End (`ESC [ 1 ~` / `ESC [ 4 ~`)
//! - **CR/LF tolerant**: CR, LF, CRLF and LFCR each end exactly one line
//! - **Ctrl+C**: drop the current line
//! - **Fixed capacity**: the edit buffer never grows
//!
//! # Quick Start
//!
//! ```text
//! serline                    # Interactive console on this terminal
//! serline -r capture.bin     # Replay bytes captured from a serial link
//! serline -q -c 64           # No echo, 64 byte buffer
//! ```

mod config;
mod console;
mod core;
mod ui;

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config as SerlineConfig;
use crate::console::{Console, ConsoleAction};
use crate::core::session::{Session, SessionEvent};
use crate::core::transport::{StreamTransport, Transport};
use crate::ui::{KeyTransport, RawModeGuard};

/// Command line options; anything unset comes from config.toml
#[derive(Default)]
struct Config {
    /// Edit buffer capacity
    capacity: Option<usize>,
    /// Start with echo off
    no_echo: bool,
    /// Prompt override
    prompt: Option<String>,
    /// Replay a capture file instead of reading the keyboard
    replay: Option<PathBuf>,
    /// Write the effective configuration and exit
    write_config: bool,
}

impl Config {
    /// Layer command line settings over the file configuration
    fn apply(&self, config: &mut SerlineConfig) {
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if self.no_echo {
            config.echo = false;
        }
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("serline {}", VERSION);
}

fn print_help() {
    eprintln!("serline {} - line editing for serial terminal sessions", VERSION);
    eprintln!();
    eprintln!("Usage: serline [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --capacity <N>    Edit buffer size in bytes (including terminator)");
    eprintln!("  -q, --no-echo         Start with echo switched off");
    eprintln!("  -p, --prompt <TEXT>   Prompt printed before each line");
    eprintln!("  -r, --replay <FILE>   Feed a captured byte stream instead of the keyboard");
    eprintln!("      --write-config    Save the effective configuration and exit");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Editing keys:");
    eprintln!("  Left/Right            Move the cursor");
    eprintln!("  Home/End              Jump to start/end of line");
    eprintln!("  Backspace/Delete      Remove before/under the cursor");
    eprintln!("  Enter                 Finish the line");
    eprintln!("  Ctrl+C                Discard the line");
    eprintln!();
    eprintln!("Console commands: echo on|off, help, exit");
    eprintln!();
    eprintln!("Configuration: ~/.serline/config.toml");
    eprintln!("Log file:      ~/.serline/serline.log (level via SERLINE_LOG)");
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--capacity" => {
                i += 1;
                let value = args.get(i).ok_or("Missing capacity argument")?;
                let capacity = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid capacity: {}", value))?;
                config.capacity = Some(capacity);
            }
            "-q" | "--no-echo" => {
                config.no_echo = true;
            }
            "-p" | "--prompt" => {
                i += 1;
                let value = args.get(i).ok_or("Missing prompt argument")?;
                config.prompt = Some(value.clone());
            }
            "-r" | "--replay" => {
                i += 1;
                let value = args.get(i).ok_or("Missing replay file argument")?;
                config.replay = Some(PathBuf::from(value));
            }
            "--write-config" => {
                config.write_config = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Log to ~/.serline/serline.log; the terminal carries the edited line
fn init_logging(config: &SerlineConfig) {
    let log_path = SerlineConfig::get_config_dir()
        .map(|dir| dir.join("serline.log"))
        .unwrap_or_else(|| PathBuf::from("serline.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("SERLINE_LOG")
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let mut config = SerlineConfig::load();
    cli.apply(&mut config);

    if cli.write_config {
        let path = config.save()?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    init_logging(&config);
    info!(
        version = VERSION,
        capacity = config.capacity,
        echo = config.echo,
        "serline starting"
    );

    match &cli.replay {
        Some(path) => run_replay(path, &config),
        None => run_interactive(&config),
    }
}

/// Interactive console on the local terminal
fn run_interactive(config: &SerlineConfig) -> anyhow::Result<()> {
    let _raw = RawModeGuard::enable().context("Failed to enable raw mode")?;

    let transport = KeyTransport::new(config.translate_newline);
    let mut session = Session::new(transport, config.capacity, config.prompt.as_str());
    session.set_echo(config.echo);

    run_console(&mut session)
}

/// Feed a capture file through the editor, echo and replies to stdout
fn run_replay(path: &Path, config: &SerlineConfig) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    info!(path = %path.display(), "replaying capture");

    let transport = StreamTransport::new(BufReader::new(file), io::stdout(), false);
    let mut session = Session::new(transport, config.capacity, config.prompt.as_str());
    session.set_echo(config.echo);

    run_console(&mut session)
}

fn run_console<T: Transport>(session: &mut Session<T>) -> anyhow::Result<()> {
    let mut console = Console::new();

    session.prompt()?;
    loop {
        match session.poll()? {
            SessionEvent::Line(line) => match console.handle(&line) {
                ConsoleAction::Reply(text) => session.write_line(&text)?,
                ConsoleAction::SetEcho(enabled) => {
                    if session.echo_enabled() != enabled {
                        session.set_echo(enabled);
                    }
                    session.write_line(if enabled { "echo on" } else { "echo off" })?;
                }
                ConsoleAction::Exit => break,
                ConsoleAction::Nothing => {}
            },
            SessionEvent::Discarded => {}
            SessionEvent::Closed => {
                if !session.buffer().is_empty() {
                    warn!(
                        bytes = session.buffer().len(),
                        "input ended with an unfinished line"
                    );
                }
                session.write_line("")?;
                break;
            }
        }
        session.prompt()?;
    }

    info!(lines = console.lines_handled(), "console finished");
    Ok(())
}
