// src/console/input.rs

//! Stdin reader feeding console lines into the runtime.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;

/// Spawn a background task that forwards each stdin line as
/// [`RuntimeEvent::ConsoleLine`]. Stops at EOF or when the runtime goes away.
pub fn spawn_console_reader(tx: mpsc::Sender<RuntimeEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(RuntimeEvent::ConsoleLine(line)).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed; console input stopped");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read console input");
                    break;
                }
            }
        }
    })
}
