#![doc = include_str!("../README.md")]

mod cli;

use std::sync::Arc;

use anyhow::Context;
use capsule_clock::{
    CapsuleGate, Clock, Countdown, DurationBreakdown, Elapsed, Readout, Remaining, SystemClock,
    Ticker, TickerHandle, spawn_tokio,
};
use clap::Parser;
use cli::config::{CliArgs, CliConfig, Mode};
use cli::telemetry::init_telemetry;
use tokio::signal;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;
    let config = CliConfig::try_from(args)?;

    log_startup_info(&config);

    match config.mode {
        Mode::Zeroed { countdown: false } => {
            println!("{}", DurationBreakdown::zero(config.options));
            Ok(())
        }
        Mode::Zeroed { countdown: true } => {
            println!("{}", CapsuleGate::Locked(Remaining::default()));
            Ok(())
        }
        Mode::Elapsed { start } => {
            let readout = Elapsed::new(start, config.options);
            if config.once {
                println!("{}", readout.read(SystemClock.now()));
                return Ok(());
            }

            let ticker = Ticker::start(SystemClock, readout, config.interval_ms, |elapsed| {
                println!("{elapsed}");
            });
            drive(ticker, Arc::new(Notify::new())).await
        }
        Mode::Countdown { open_date } => {
            let readout = Countdown::new(open_date);
            if config.once {
                println!("{}", readout.read(SystemClock.now()));
                return Ok(());
            }

            let opened = Arc::new(Notify::new());
            let notify = Arc::clone(&opened);
            let handle = TickerHandle::new();
            let stopper = handle.clone();
            let ticker = Ticker::start_with(
                handle,
                SystemClock,
                readout,
                config.interval_ms,
                move |gate: CapsuleGate| {
                    println!("{gate}");
                    if gate.is_open() {
                        stopper.stop();
                        notify.notify_one();
                    }
                },
            );
            drive(ticker, opened).await
        }
    }
}

/// Runs `ticker` until a shutdown signal arrives or `finished` is notified.
async fn drive<R, F>(
    ticker: Ticker<SystemClock, R, F>,
    finished: Arc<Notify>,
) -> anyhow::Result<()>
where
    R: Readout + Send + 'static,
    F: FnMut(R::Output) + Send + 'static,
{
    let task = spawn_tokio(ticker);

    tokio::select! {
        () = shutdown_signal() => {},
        () = finished.notified() => {
            #[cfg(feature = "tracing")]
            tracing::info!("Capsule is open");
        },
    }

    task.stop();
    let _ticks = task.join().await.context("ticker task failed")?;

    #[cfg(feature = "tracing")]
    match _ticks {
        Some(ticks) => tracing::info!(ticks, "Ticker finished"),
        None => tracing::info!("Ticker cancelled"),
    }
    Ok(())
}

fn log_startup_info(_config: &CliConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting capsule clock with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting capsule clock in {:?} every {}ms",
            _config.mode,
            _config.interval_ms
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to install SIGTERM handler: {:?}", _e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(_e) = signal::ctrl_c().await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to install Ctrl+C handler: {:?}", _e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
