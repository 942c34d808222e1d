use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, warn};

use super::manager::{GraphWriter, GraphWriterRunnable};
use crate::Error;

/// A real-time feed that periodically fetches data and turns it into
/// writer units.
///
/// Each updater runs on its own thread and reaches the graph only through
/// the [`GraphWriter`] it is handed.
pub trait PollingGraphUpdater: Send + 'static {
    /// Name of the updater in the router configuration
    fn config_ref(&self) -> &str;

    /// Time between two polls; `None` or zero polls once
    fn polling_period(&self) -> Option<Duration>;

    /// Registers the updater's services in the graph
    fn setup_unit(&self) -> Box<dyn GraphWriterRunnable>;

    /// Fetches fresh data and submits it
    fn run_polling(&mut self, writer: &GraphWriter) -> Result<(), Error>;

    /// Removes everything the updater added to the graph
    fn teardown_unit(&self) -> Box<dyn GraphWriterRunnable>;
}

/// Polling loop of one feed. Returns the feed's teardown unit once `stop`
/// fires or hangs up.
pub(crate) fn run_feed<U: PollingGraphUpdater>(
    mut updater: U,
    writer: &GraphWriter,
    stop: &Receiver<()>,
) -> Box<dyn GraphWriterRunnable> {
    loop {
        if let Err(e) = updater.run_polling(writer) {
            warn!("Polling of updater {} failed: {e}", updater.config_ref());
        }

        let Some(period) = updater.polling_period().filter(|p| !p.is_zero()) else {
            debug!("Updater {} polls only once", updater.config_ref());
            break;
        };
        match stop.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    updater.teardown_unit()
}
