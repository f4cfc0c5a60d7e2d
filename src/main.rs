//! deadline-connect
//!
//! Opens TCP connections that are guaranteed to resolve within a deadline.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!                │                 coordinator                  │
//!   dial ───────▶│  attempt ── wait(gate, deadline) ── retire   │──▶ TcpStream
//!                │     ▲                 ▲                      │    | Connect error
//!                └─────┼─────────────────┼──────────────────────┘    | Timeout
//!                      │ publish+signal  │ signal
//!               ┌──────┴─────┐    ┌──────┴─────┐
//!               │ connector  │    │  watchdog  │
//!               │ (connect)  │    │  (sleep)   │
//!               └────────────┘    └────────────┘
//! ```
//!
//! `probe` runs the same dial against a list of configured targets, once or
//! on an interval.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use deadline_connect::config::load_config;
use deadline_connect::config::watcher::ConfigWatcher;
use deadline_connect::config::ObservabilityConfig;
use deadline_connect::lifecycle::{signals, startup, Shutdown};
use deadline_connect::probe::{self, ProbeMonitor};
use deadline_connect::{Deadline, DialError, DialResult, DialStrategy, Dialer, Target};

#[derive(Parser)]
#[command(name = "deadline-connect")]
#[command(about = "Open TCP connections with a hard deadline", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect once and report the outcome
    Dial {
        /// host:port, or [v6-literal]:port
        target: Target,

        /// Deadline in whole seconds
        #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        #[arg(short, long, value_enum, default_value_t = DialStrategy::Race)]
        strategy: DialStrategy,
    },
    /// Probe the targets listed in a config file
    Probe {
        #[arg(short, long)]
        config: PathBuf,

        /// Probe once, print JSON, and exit
        #[arg(long)]
        once: bool,

        /// Reload the config file when it changes
        #[arg(long)]
        watch_config: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dial {
            target,
            timeout,
            strategy,
        } => {
            let observability = ObservabilityConfig {
                log_level: "warn".to_string(),
                ..ObservabilityConfig::default()
            };
            startup::init_observability(&observability, cli.log_level.as_deref());
            dial(&target, Deadline::from_secs(timeout), strategy).await
        }
        Commands::Probe {
            config,
            once,
            watch_config,
        } => {
            let loaded = load_config(&config)?;
            startup::init_observability(&loaded.observability, cli.log_level.as_deref());
            let dialer = startup::build_dialer(&loaded);

            if once {
                let reports = probe::run_once(&dialer, &loaded.probe.targets).await;
                println!("{}", serde_json::to_string_pretty(&reports)?);
                let all_up = reports.iter().all(|r| r.is_up());
                return Ok(if all_up { ExitCode::SUCCESS } else { ExitCode::FAILURE });
            }

            let shutdown = Shutdown::new();
            let (_watcher, updates, _updates_tx) = if watch_config {
                let (watcher, updates) = ConfigWatcher::new(&config);
                (Some(watcher.run()?), updates, None)
            } else {
                let (tx, updates) = mpsc::unbounded_channel();
                (None, updates, Some(tx))
            };

            let monitor = ProbeMonitor::new(dialer, loaded.probe);
            let handle = tokio::spawn(monitor.run(updates, shutdown.subscribe()));

            signals::wait_for_signal().await?;
            shutdown.trigger();
            handle.await?;

            tracing::info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn dial(
    target: &Target,
    deadline: Deadline,
    strategy: DialStrategy,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let dialer = Dialer::tcp().with_strategy(strategy);
    let started = Instant::now();
    let result = dialer.dial_target(target, deadline).await;

    match &result {
        Ok(stream) => println!(
            "connected to {} from {} in {} ms",
            stream.peer_addr()?,
            stream.local_addr()?,
            started.elapsed().as_millis()
        ),
        Err(e) => eprintln!("{}", e),
    }

    Ok(ExitCode::from(exit_status(&result)))
}

/// 0 on success, 1 on a connect failure, 2 on a timeout.
fn exit_status<S>(result: &DialResult<S>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(DialError::Timeout { .. }) => 2,
        Err(DialError::Connect { .. }) => 1,
    }
}
