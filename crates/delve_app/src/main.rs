//! # delve_app
//!
//! Runs one headless game session. Client messages are read as JSON lines
//! from stdin and render frames are written as JSON lines to stdout; logs
//! go to stderr. The session closes on end of input or Ctrl-C.

use anyhow::Result;
use clap::Parser;
use delve_net::NetError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use delve_app::{SessionError, SessionRegistry, TickConfig};

#[derive(Parser)]
#[command(name = "delve_app", about = "Headless dungeon game session")]
struct Args {
    /// Ticks per second
    #[arg(long, default_value_t = 10.0)]
    tick_rate: f64,

    /// Stop ticking after this many ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Ticks per logged timing summary (0 = off)
    #[arg(long, default_value_t = 30)]
    stats_window: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("delve_app=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.max_ticks,
        stats_window: args.stats_window,
    };

    let registry = SessionRegistry::new();
    let (frames_tx, mut frames_rx) = mpsc::unbounded_channel::<String>();
    let id = registry.open(config, frames_tx)?;
    info!(%id, "session started");

    // Ends once the session's render stage is dropped.
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(frame) = frames_rx.recv().await {
            stdout.write_all(frame.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("end of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match registry.handle_text(id, &line) {
                    Ok(()) => {}
                    Err(SessionError::Input(NetError::Closed)) => {
                        info!("session stopped ticking");
                        break;
                    }
                    Err(e) => warn!(error = %e, "rejected client message"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    let ticks = tokio::task::spawn_blocking(move || registry.close(id)).await??;
    writer.await??;
    info!(ticks, "session finished");
    Ok(())
}
