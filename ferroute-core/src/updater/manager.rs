//! Single-writer coordination of graph mutation
//!
//! Every change to the graph is a [`GraphWriterRunnable`] executed by one
//! writer thread, strictly in submission order. The writer works on a
//! private copy of the latest snapshot and publishes the result once the
//! queue is drained, so searches only ever see complete units.

use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use super::polling::{PollingGraphUpdater, run_feed};
use crate::Error;
use crate::model::Graph;

/// A bounded, atomic graph mutation
pub trait GraphWriterRunnable: Send {
    fn run(self: Box<Self>, graph: &mut Graph);
}

impl<F> GraphWriterRunnable for F
where
    F: FnOnce(&mut Graph) + Send,
{
    fn run(self: Box<Self>, graph: &mut Graph) {
        (*self)(graph);
    }
}

/// Shared access to the latest published graph
#[derive(Debug, Clone)]
pub struct GraphHandle {
    current: Arc<RwLock<Arc<Graph>>>,
}

impl GraphHandle {
    pub fn new(graph: Graph) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(graph))),
        }
    }

    /// Latest published graph. The lock is held only to clone the pointer;
    /// searches run on the returned snapshot without any lock.
    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    fn publish(&self, graph: Arc<Graph>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = graph;
    }
}

pub(crate) enum WriterCommand {
    Run {
        unit: Box<dyn GraphWriterRunnable>,
        done: Option<Sender<()>>,
    },
    Stop,
}

/// Submits writer units to the writer thread. Cheap to clone; every feed
/// gets its own.
#[derive(Debug, Clone)]
pub struct GraphWriter {
    sender: Sender<WriterCommand>,
}

impl GraphWriter {
    /// Queues a unit without waiting for it
    pub fn execute(&self, unit: impl GraphWriterRunnable + 'static) -> Result<(), Error> {
        self.submit(Box::new(unit), None)
    }

    /// Queues a unit and waits until it has been applied and published
    pub fn execute_blocking(&self, unit: impl GraphWriterRunnable + 'static) -> Result<(), Error> {
        self.submit_blocking(Box::new(unit))
    }

    pub(crate) fn submit(
        &self,
        unit: Box<dyn GraphWriterRunnable>,
        done: Option<Sender<()>>,
    ) -> Result<(), Error> {
        self.sender
            .send(WriterCommand::Run { unit, done })
            .map_err(|_| Error::UpdaterStopped("graph writer is not running".into()))
    }

    pub(crate) fn submit_blocking(&self, unit: Box<dyn GraphWriterRunnable>) -> Result<(), Error> {
        let (done, finished) = crossbeam_channel::bounded(1);
        self.submit(unit, Some(done))?;
        finished.recv().map_err(|_| {
            Error::UpdaterStopped("graph writer stopped before the unit finished".into())
        })
    }
}

struct Feed {
    config_ref: String,
    stop: Sender<()>,
    thread: JoinHandle<Box<dyn GraphWriterRunnable>>,
}

/// Owns the writer thread and the polling feeds
pub struct GraphUpdaterManager {
    handle: GraphHandle,
    writer: GraphWriter,
    writer_thread: Option<JoinHandle<()>>,
    feeds: Vec<Feed>,
}

impl GraphUpdaterManager {
    pub fn new(graph: Graph) -> Result<Self, Error> {
        let handle = GraphHandle::new(graph);
        let (sender, receiver) = crossbeam_channel::unbounded();
        let writer_handle = handle.clone();
        let writer_thread = thread::Builder::new()
            .name("graph-writer".into())
            .spawn(move || run_writer(&receiver, &writer_handle))?;

        Ok(Self {
            handle,
            writer: GraphWriter { sender },
            writer_thread: Some(writer_thread),
            feeds: Vec::new(),
        })
    }

    pub fn handle(&self) -> GraphHandle {
        self.handle.clone()
    }

    pub fn writer(&self) -> GraphWriter {
        self.writer.clone()
    }

    pub fn execute(&self, unit: impl GraphWriterRunnable + 'static) -> Result<(), Error> {
        self.writer.execute(unit)
    }

    pub fn execute_blocking(&self, unit: impl GraphWriterRunnable + 'static) -> Result<(), Error> {
        self.writer.execute_blocking(unit)
    }

    /// Runs the updater's setup unit, then starts its polling thread
    pub fn add_updater<U: PollingGraphUpdater>(&mut self, updater: U) -> Result<(), Error> {
        let config_ref = updater.config_ref().to_string();
        self.writer.submit_blocking(updater.setup_unit())?;

        let (stop, stopped) = crossbeam_channel::bounded(1);
        let writer = self.writer.clone();
        let thread = thread::Builder::new()
            .name(format!("updater-{config_ref}"))
            .spawn(move || run_feed(updater, &writer, &stopped))?;

        info!("Started graph updater {config_ref}");
        self.feeds.push(Feed {
            config_ref,
            stop,
            thread,
        });
        Ok(())
    }

    /// Config references of the running updaters
    pub fn updaters(&self) -> impl Iterator<Item = &str> {
        self.feeds.iter().map(|feed| feed.config_ref.as_str())
    }

    /// Stops all feeds, applies their teardown units and stops the writer.
    ///
    /// Units submitted before the call are still applied. Calling it again
    /// does nothing.
    pub fn stop(&mut self) -> Result<(), Error> {
        for feed in self.feeds.drain(..) {
            // a feed that ran once has already hung up
            let _ = feed.stop.send(());
            match feed.thread.join() {
                Ok(teardown) => {
                    if let Err(e) = self.writer.submit(teardown, None) {
                        warn!("Teardown of updater {} not applied: {e}", feed.config_ref);
                    }
                }
                Err(_) => warn!("Updater {} panicked", feed.config_ref),
            }
            debug!("Stopped graph updater {}", feed.config_ref);
        }

        if let Some(thread) = self.writer_thread.take() {
            let _ = self.writer.sender.send(WriterCommand::Stop);
            thread
                .join()
                .map_err(|_| Error::UnrecoverableError("graph writer thread panicked"))?;
            info!("Graph updater manager stopped at graph version {}", self.handle.version());
        }
        Ok(())
    }
}

impl Drop for GraphUpdaterManager {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop graph updaters: {e}");
        }
    }
}

fn run_writer(receiver: &Receiver<WriterCommand>, handle: &GraphHandle) {
    debug!("Graph writer started");
    while let Ok(first) = receiver.recv() {
        let mut graph = Graph::clone(&handle.snapshot());
        let mut finished = Vec::new();
        let mut applied = 0usize;
        let mut stop = false;

        for command in std::iter::once(first).chain(receiver.try_iter()) {
            match command {
                WriterCommand::Run { unit, done } => {
                    unit.run(&mut graph);
                    graph.bump_version();
                    applied += 1;
                    finished.extend(done);
                }
                WriterCommand::Stop => {
                    stop = true;
                    break;
                }
            }
        }

        if applied > 0 {
            debug!(
                "Applied {applied} writer units, publishing graph version {}",
                graph.version()
            );
            handle.publish(Arc::new(graph));
        }
        for done in finished {
            // the submitter may have stopped waiting
            let _ = done.send(());
        }
        if stop {
            break;
        }
    }
    debug!("Graph writer stopped");
}
