//! Dedicated surface thread
//!
//! Drawing surfaces are single-owner: exactly one thread may mutate them.
//! [`SurfaceWorker`] moves the surface and the [`LayerStore`] onto a named
//! OS thread and feeds it jobs over a bounded queue. Jobs run one at a
//! time in submission order, so bookkeeping never races the surface.

use crate::command::{ApplySettings, MapCommand};
use crate::layers::{LayerStore, LayerSummary};
use mapkit_core::{DrawingSurface, Error, Result, SurfaceError, SurfaceResult};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

pub(crate) const THREAD_NAME: &str = "mapkit-surface";

/// Work item for the surface thread
pub(crate) enum Job {
    /// Apply a command; without a reply channel, failures are only logged
    Apply {
        tool: &'static str,
        command: MapCommand,
        reply: Option<oneshot::Sender<SurfaceResult<String>>>,
    },
    /// Snapshot the layer bookkeeping
    Layers {
        reply: oneshot::Sender<Vec<LayerSummary>>,
    },
    /// Answer once every earlier job has run
    Flush { reply: oneshot::Sender<()> },
}

/// Handle to the surface thread
///
/// Dropping the last handle closes the queue; the thread drains what is
/// left and exits.
#[derive(Debug, Clone)]
pub(crate) struct SurfaceWorker {
    jobs: mpsc::Sender<Job>,
}

impl SurfaceWorker {
    /// Start the thread that owns `surface`
    pub(crate) fn spawn(
        surface: Box<dyn DrawingSurface>,
        capacity: usize,
        settings: ApplySettings,
    ) -> Result<Self> {
        let (jobs, queue) = mpsc::channel(capacity.max(1));

        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(surface, queue, settings))?;

        debug!(capacity, "Surface worker started");
        Ok(Self { jobs })
    }

    /// Queue a job, waiting for room if the queue is full
    pub(crate) async fn submit(&self, job: Job) -> Result<()> {
        self.jobs.send(job).await.map_err(|_| Error::WorkerStopped)
    }
}

fn run(mut surface: Box<dyn DrawingSurface>, mut queue: mpsc::Receiver<Job>, settings: ApplySettings) {
    let mut layers = LayerStore::new();

    while let Some(job) = queue.blocking_recv() {
        match job {
            Job::Apply {
                tool,
                command,
                reply,
            } => {
                let result = apply_guarded(command, surface.as_mut(), &mut layers, &settings);
                match reply {
                    Some(reply) => {
                        if reply.send(result).is_err() {
                            debug!(tool_name = tool, "Caller stopped waiting for map command");
                        }
                    }
                    None => log_deferred(tool, &result),
                }
            }
            Job::Layers { reply } => {
                let _ = reply.send(layers.summaries());
            }
            Job::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }

    info!("Surface worker stopped");
}

/// Apply a command, turning a panic in the surface into an error
fn apply_guarded(
    command: MapCommand,
    surface: &mut dyn DrawingSurface,
    layers: &mut LayerStore,
    settings: &ApplySettings,
) -> SurfaceResult<String> {
    catch_unwind(AssertUnwindSafe(|| command.apply(surface, layers, settings)))
        .unwrap_or_else(|payload| Err(SurfaceError::Panicked(panic_message(payload.as_ref()))))
}

fn log_deferred(tool: &'static str, result: &SurfaceResult<String>) {
    match result {
        Ok(message) => debug!(tool_name = tool, %message, "Map command applied"),
        Err(SurfaceError::Panicked(reason)) => {
            error!(tool_name = tool, %reason, "Drawing surface panicked while applying map command");
        }
        Err(err) => warn!(tool_name = tool, error = %err, "Map command failed on the surface"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
