// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::errors::Result;

use super::host::Host;
use super::{RuntimeEvent, RuntimeOptions};

/// Drives the host one frame per timer tick and reacts to `RuntimeEvent`s.
///
/// This is a pure IO shell around [`Host`], which contains all the frame
/// semantics. Everything runs on the current thread: the host's Lua state
/// never leaves it.
pub struct Runtime {
    host: Host,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    options: RuntimeOptions,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("host", &self.host)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(host: Host, event_rx: mpsc::Receiver<RuntimeEvent>, options: RuntimeOptions) -> Self {
        Self {
            host,
            event_rx,
            options,
        }
    }

    /// Main frame loop.
    ///
    /// - Every tick runs one host frame (one scheduler step).
    /// - Console lines are executed between frames.
    /// - Stops on shutdown, or when idle if `exit_when_idle` is set.
    pub async fn run(mut self) -> Result<Host> {
        info!(fps = self.host.target_fps(), "blocktask runtime started");

        let mut fps = self.host.target_fps();
        let mut ticker = frame_interval(fps);
        let mut events_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.host.frame();
                    if !report.is_empty() {
                        debug!(?report, "frame stepped");
                    }

                    if self.options.exit_when_idle && self.host.live_task_count() == 0 {
                        info!("no tasks remaining; exiting");
                        break;
                    }
                }
                event = self.event_rx.recv(), if events_open => {
                    match event {
                        Some(RuntimeEvent::ConsoleLine(line)) => {
                            self.host.exec_console(&line);
                            if self.host.target_fps() != fps {
                                fps = self.host.target_fps();
                                ticker = frame_interval(fps);
                                info!(fps, "frame rate changed");
                            }
                        }
                        Some(RuntimeEvent::ShutdownRequested) => {
                            info!("shutdown requested; stopping runtime");
                            break;
                        }
                        None => {
                            debug!("runtime event channel closed");
                            events_open = false;
                        }
                    }
                }
            }
        }

        info!(live_tasks = self.host.live_task_count(), "runtime exiting");
        Ok(self.host)
    }
}

fn frame_interval(fps: u32) -> Interval {
    let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
