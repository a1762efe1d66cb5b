//! tabstatus-server/src/server.rs
//!
//! Console front end: stdin lines become commands until `quit`, Ctrl-C or
//! end of input.

use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tabstatus_core::tasks::start_display_refresh;
use tabstatus_core::Error;

use crate::commands;
use crate::context::ServerContext;
use crate::Args;

pub async fn run_server(args: Args) -> Result<(), Error> {
    let ctx = Arc::new(ServerContext::new(&args).await?);

    let refresh_handle = start_display_refresh(
        ctx.manager.clone(),
        ctx.refresh_interval,
        ctx.shutdown_token.child_token(),
    );

    // Ctrl-C => cancel
    let token_for_ctrlc = ctx.shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
            return;
        }
        info!("Ctrl-C detected; shutting down...");
        token_for_ctrlc.cancel();
    });

    let mut lines = spawn_stdin_reader();
    println!("tabstatus console ready. Type 'help' for commands.");

    loop {
        tokio::select! {
            _ = ctx.shutdown_token.cancelled() => {
                info!("Shutdown signaled; leaving console loop.");
                break;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    warn!("Console input closed; waiting for Ctrl-C.");
                    ctx.shutdown_token.cancelled().await;
                    break;
                };
                let (quit_requested, output) = commands::dispatch(&line, &ctx).await;
                if let Some(output) = output {
                    println!("{}", output.trim_end());
                }
                if quit_requested {
                    break;
                }
            }
        }
    }

    ctx.shutdown().await;
    if let Some(handle) = refresh_handle {
        if let Err(e) = handle.await {
            error!("Display refresh task ended abnormally: {:?}", e);
        }
    }
    info!("Server shutdown complete.");
    Ok(())
}

/// Reads stdin on a plain thread so a pending read never holds up runtime
/// shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        let mut reader = BufReader::new(std::io::stdin());
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
