//! Student name printing demonstrations.
//!
//! A print run takes an ordered list of students, prints the lead items on the
//! calling task and hands consecutive chunks of the rest to freshly spawned
//! worker threads, returning only once every worker finished (or the run was
//! cancelled).
//! The synchronized variant emits each print statement while holding a lock
//! created for that run, so statements never interleave.

use crate::config::PrinterConfig;
use crate::models::NamedItem;
use log::{debug, error, info, warn};
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Destination of printed text.
///
/// A print statement reaches the sink as several fragments. Without a lock,
/// fragments of concurrent statements may interleave.
pub trait LineSink: Send + Sync {
    fn write_fragment(&self, fragment: &str);
}

/// Writes to the process standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_fragment(&self, fragment: &str) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout
            .write_all(fragment.as_bytes())
            .and_then(|_| stdout.flush())
        {
            error!("Failed to write to stdout: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Parallel,
    Synchronized,
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => write!(f, "parallel"),
            Self::Synchronized => write!(f, "synchronized"),
        }
    }
}

/// How a print run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Every worker was joined. `failed_workers` panicked and were logged.
    Completed {
        printed: usize,
        failed_workers: usize,
    },
    /// Not enough items; nothing was printed
    Skipped { available: usize, required: usize },
    /// Cancelled while waiting for the workers. Statements already printed
    /// stay printed; the worker threads keep running detached.
    Interrupted { printed: usize },
}

/// State shared by the calling task and the workers of one print run
struct Emitter {
    sink: Arc<dyn LineSink>,
    lock: Option<Mutex<()>>,
    printed: AtomicUsize,
}

impl Emitter {
    fn emit(&self, label: &str, position: usize, item: &NamedItem) {
        // A worker that panicked while printing poisons the lock; the guard
        // itself is still released, so keep going.
        let _guard = self
            .lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));

        self.sink.write_fragment(label);
        self.sink.write_fragment(&format!(" - Student {position}: "));
        self.sink.write_fragment(&item.name);
        self.sink.write_fragment("\n");
        self.printed.fetch_add(1, Ordering::SeqCst);
    }

    fn printed(&self) -> usize {
        self.printed.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct StudentPrinter {
    config: PrinterConfig,
    sink: Arc<dyn LineSink>,
}

impl StudentPrinter {
    pub fn new(config: PrinterConfig, sink: Arc<dyn LineSink>) -> Self {
        Self { config, sink }
    }

    /// Printer writing to standard output
    pub fn stdout(config: PrinterConfig) -> Self {
        Self::new(config, Arc::new(StdoutSink))
    }

    /// Minimum number of items a run needs
    pub fn required_items(&self) -> usize {
        self.config.required_items()
    }

    /// Prints the items from the calling task and the worker threads without
    /// any coordination between print statements.
    pub async fn print_parallel(
        &self,
        items: &[NamedItem],
        cancel: &CancellationToken,
    ) -> PrintOutcome {
        self.run(items, cancel, PrintMode::Parallel).await
    }

    /// Same partition as [`Self::print_parallel`], but each print statement
    /// holds a lock shared by every participant of the run.
    pub async fn print_synchronized(
        &self,
        items: &[NamedItem],
        cancel: &CancellationToken,
    ) -> PrintOutcome {
        self.run(items, cancel, PrintMode::Synchronized).await
    }

    async fn run(
        &self,
        items: &[NamedItem],
        cancel: &CancellationToken,
        mode: PrintMode,
    ) -> PrintOutcome {
        info!("Was invoked method for {} printing of student names", mode);

        let required = self.config.required_items();
        if items.len() < required {
            warn!(
                "Not enough students for {} printing (need {}, have {})",
                mode,
                required,
                items.len()
            );
            return PrintOutcome::Skipped {
                available: items.len(),
                required,
            };
        }

        let emitter = Arc::new(Emitter {
            sink: Arc::clone(&self.sink),
            lock: match mode {
                PrintMode::Parallel => None,
                PrintMode::Synchronized => Some(Mutex::new(())),
            },
            printed: AtomicUsize::new(0),
        });

        let lead = self.config.lead_items;
        for (index, item) in items[..lead].iter().enumerate() {
            emitter.emit("Main thread", index + 1, item);
        }

        let per_worker = self.config.items_per_worker;
        let mut workers = Vec::with_capacity(self.config.workers);
        let mut failed_workers = 0;
        for worker in 0..self.config.workers {
            let start = lead + worker * per_worker;
            let chunk: Vec<(usize, NamedItem)> = items[start..start + per_worker]
                .iter()
                .cloned()
                .enumerate()
                .map(|(offset, item)| (start + offset + 1, item))
                .collect();
            let label = format!("Thread {}", worker + 1);
            let emitter = Arc::clone(&emitter);
            // Dropped without a send when the worker panics
            let (done_tx, done_rx) = oneshot::channel::<()>();

            debug!("Starting {} with {} students", label, chunk.len());
            let spawned = thread::Builder::new().name(label.clone()).spawn({
                let label = label.clone();
                move || {
                    for (position, item) in &chunk {
                        emitter.emit(&label, *position, item);
                    }
                    let _ = done_tx.send(());
                }
            });
            match spawned {
                Ok(_) => workers.push((label, done_rx)),
                Err(e) => {
                    failed_workers += 1;
                    error!("Failed to start {} for {} printing: {}", label, mode, e);
                }
            }
        }

        for (label, done) in workers {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let printed = emitter.printed();
                    warn!("{} printing was interrupted after {} statements", mode, printed);
                    return PrintOutcome::Interrupted { printed };
                }
                finished = done => {
                    if finished.is_err() {
                        failed_workers += 1;
                        error!("{} failed during {} printing", label, mode);
                    }
                }
            }
        }

        let printed = emitter.printed();
        info!(
            "{} printing completed ({} statements, {} failed workers)",
            mode, printed, failed_workers
        );
        PrintOutcome::Completed {
            printed,
            failed_workers,
        }
    }
}
