//! Outbound frame delivery.

use tokio::sync::mpsc;
use tracing::debug;

/// Where a session's encoded render frames go.
///
/// Called from the worker thread once per tick with a JSON text frame.
/// Delivery must not block; a sink whose peer has gone away drops frames.
pub trait FrameSink: Send {
    fn send_frame(&mut self, frame: String);
}

impl FrameSink for mpsc::UnboundedSender<String> {
    fn send_frame(&mut self, frame: String) {
        if self.send(frame).is_err() {
            debug!("frame receiver closed, dropping frame");
        }
    }
}

/// Collects frames in memory.
impl FrameSink for Vec<String> {
    fn send_frame(&mut self, frame: String) {
        self.push(frame);
    }
}
