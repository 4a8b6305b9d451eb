//! A running game session: its components, its input channel and the
//! worker thread that ticks it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use delve_component::{Components, Entity};
use delve_net::{FrameSink, InputHandler, NetError, input_channel};
use delve_system::default_systems;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TickConfig;
use crate::level;
use crate::tick::TickLoop;

/// Errors raised while opening, driving or closing a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("tick rate must be a finite positive number, got {0}")]
    InvalidTickRate(f64),

    #[error("failed to build worker runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("session worker panicked")]
    WorkerPanicked,

    #[error("no session with id {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Input(#[from] NetError),
}

/// One game: a populated [`Components`] shared with a dedicated worker
/// thread that runs the default systems at the configured rate.
///
/// Dropping a session without calling [`Session::close`] still stops and
/// joins the worker.
#[derive(Debug)]
pub struct Session {
    components: Arc<Mutex<Components>>,
    input: InputHandler,
    stop: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<u64>>,
}

impl Session {
    /// Build the starting level and start ticking it, sending frames to
    /// `sink`.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the worker cannot be started.
    pub fn open<S: FrameSink + 'static>(config: TickConfig, sink: S) -> Result<Self, SessionError> {
        if !config.is_valid() {
            return Err(SessionError::InvalidTickRate(config.tick_rate));
        }

        let mut components = Components::new();
        let player = level::spawn_level(&mut components);
        let components = Arc::new(Mutex::new(components));
        let (input, inputs) = input_channel(player);
        let systems = default_systems(sink);

        let mut tick_loop = TickLoop::new(config, Arc::clone(&components), systems, inputs);
        let (stop_tx, stop_rx) = oneshot::channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(SessionError::Runtime)?;
        let worker = thread::Builder::new()
            .name("delve-worker".to_string())
            .spawn(move || runtime.block_on(tick_loop.run(stop_rx)))
            .map_err(SessionError::Spawn)?;

        info!(%player, "session opened");
        Ok(Self {
            components,
            input,
            stop: Some(stop_tx),
            worker: Some(worker),
        })
    }

    /// The entity driven by this session's input.
    #[must_use]
    pub fn player(&self) -> Entity {
        self.input.entity()
    }

    /// A handler the transport can use to feed client messages in.
    #[must_use]
    pub fn input_handler(&self) -> InputHandler {
        self.input.clone()
    }

    /// Decode and queue one client message.
    ///
    /// # Errors
    ///
    /// Fails on malformed input or once the worker has stopped.
    pub fn handle_text(&self, text: &str) -> Result<(), SessionError> {
        self.input.handle_text(text)?;
        Ok(())
    }

    /// The shared component store. Lock it for the whole of any
    /// read-modify-write sequence.
    #[must_use]
    pub fn components(&self) -> &Arc<Mutex<Components>> {
        &self.components
    }

    /// Stop the worker, wait for it and return how many ticks it ran.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WorkerPanicked`] if a stage panicked.
    pub fn close(mut self) -> Result<u64, SessionError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<u64, SessionError> {
        if let Some(stop) = self.stop.take() {
            // The worker may already have hit its tick limit.
            let _ = stop.send(());
        }
        let Some(worker) = self.worker.take() else {
            return Ok(0);
        };
        let ticks = worker.join().map_err(|_| SessionError::WorkerPanicked)?;
        info!(ticks, "session closed");
        Ok(ticks)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "session worker did not shut down cleanly");
        }
    }
}
