//! Process-wide set of active sessions.

use dashmap::DashMap;
use delve_net::FrameSink;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TickConfig;
use crate::session::{Session, SessionError};

/// Active sessions keyed by id. Safe to share between transport tasks.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Session>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session and return its id.
    ///
    /// # Errors
    ///
    /// Propagates [`Session::open`] failures.
    pub fn open<S: FrameSink + 'static>(
        &self,
        config: TickConfig,
        sink: S,
    ) -> Result<Uuid, SessionError> {
        let session = Session::open(config, sink)?;
        let id = Uuid::new_v4();
        self.sessions.insert(id, session);
        info!(%id, active = self.sessions.len(), "session registered");
        Ok(id)
    }

    /// Route one inbound text message to a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id, or the
    /// session's own error.
    pub fn handle_text(&self, id: Uuid, text: &str) -> Result<(), SessionError> {
        self.sessions
            .get(&id)
            .ok_or(SessionError::NotFound(id))?
            .handle_text(text)
    }

    /// Remove a session, stop its worker and return how many ticks it ran.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub fn close(&self, id: Uuid) -> Result<u64, SessionError> {
        let (_, session) = self.sessions.remove(&id).ok_or(SessionError::NotFound(id))?;
        let ticks = session.close()?;
        info!(%id, ticks, active = self.sessions.len(), "session unregistered");
        Ok(ticks)
    }

    /// Close every session.
    pub fn close_all(&self) {
        let ids: Vec<Uuid> = self.sessions.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Err(e) = self.close(id) {
                warn!(%id, error = %e, "failed to close session");
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
