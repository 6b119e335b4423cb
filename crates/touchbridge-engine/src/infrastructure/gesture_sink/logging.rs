//! Logging gesture sink: the stroke back-end of the headless runner.
//!
//! Each dispatched stroke is written to the log and scheduled for a
//! completion report after its nominal duration. Scheduling goes over
//! an unbounded channel so `dispatch` never blocks and works from any
//! thread, including the nudge driver; the runner's pump task sleeps
//! out each duration on the Tokio runtime and then calls back into the
//! engine with `on_stroke_completed`.
//!
//! Because the engine dispatches at most one stroke at a time, the pump
//! can process the channel strictly in order; a stroke's completion is
//! always reported before the stroke it unblocks is scheduled.

use tokio::sync::mpsc;
use tracing::info;

use touchbridge_core::{new_dispatch_handle, DispatchHandle, DispatchRequest};

use crate::application::dispatch_strokes::{GestureSink, SinkError};

/// A stroke whose completion report is owed after `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledStroke {
    pub handle: DispatchHandle,
    pub duration_ms: u64,
}

/// [`GestureSink`] implementation that logs strokes and hands their
/// completion schedule to the runner.
pub struct LoggingGestureSink {
    tx: mpsc::UnboundedSender<ScheduledStroke>,
}

impl LoggingGestureSink {
    /// Creates the sink and the receiver the runner pumps completions from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduledStroke>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl GestureSink for LoggingGestureSink {
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchHandle, SinkError> {
        let handle = new_dispatch_handle();
        info!(
            %handle,
            path = ?request.path(),
            duration_ms = request.duration_ms,
            "rendering stroke"
        );
        self.tx
            .send(ScheduledStroke {
                handle,
                duration_ms: request.duration_ms,
            })
            .map_err(|_| SinkError::Unavailable {
                reason: "stroke scheduler stopped".to_string(),
            })?;
        Ok(handle)
    }
}
