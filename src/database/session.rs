//! Session state: at most one live client, the home directory and the
//! read-only flag, behind a single `RwLock`.
//!
//! `configure` and `close` take the write lock; every accessor takes the read
//! lock. Clients are handed out as `Arc<C>`, so a query already running on a
//! client keeps it alive across a reconfigure; the client's own close waits
//! for that query before releasing the engine handle.

use crate::database::connection::ConnectionMetadata;
use crate::database::traits::DatabaseClient;
use crate::error::{DatabaseError, DbResult};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of a session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unconfigured,
    Configured,
    Reconfigured,
    Closed,
}

struct SessionState<C> {
    client: Option<Arc<C>>,
    db_path: String,
    home_dir: String,
    read_only: bool,
    phase: SessionPhase,
}

impl<C> Default for SessionState<C> {
    fn default() -> Self {
        Self {
            client: None,
            db_path: String::new(),
            home_dir: String::new(),
            read_only: false,
            phase: SessionPhase::Unconfigured,
        }
    }
}

pub struct SessionStore<C: DatabaseClient> {
    state: RwLock<SessionState<C>>,
}

impl<C: DatabaseClient> SessionStore<C> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Creates a configured session around an already opened client.
    pub fn with_client(client: C) -> Self {
        let state = SessionState {
            db_path: client.db_path().to_string(),
            read_only: client.is_read_only(),
            client: Some(Arc::new(client)),
            phase: SessionPhase::Configured,
            ..SessionState::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Replaces the connection and/or updates the home directory.
    ///
    /// A non-empty `db_path` always closes the current client first. If the
    /// new one fails to open the session is left without a connection, but a
    /// non-empty `home_dir` and the read-only flag are still applied.
    pub fn configure(&self, db_path: &str, home_dir: &str, read_only: bool) -> DbResult<()> {
        let mut state = self.state.write();

        if state.phase == SessionPhase::Closed {
            return Err(DatabaseError::SessionClosed);
        }

        let mut outcome = Ok(());
        let mut applied = false;

        if !db_path.is_empty() {
            if let Some(previous) = state.client.take() {
                debug!("Closing existing connection to {}", previous.db_path());
                previous.close();
            }
            state.db_path.clear();

            match C::open(db_path, read_only) {
                Ok(client) => {
                    info!(
                        backend = client.backend(),
                        read_only, "Connected to database: {}", db_path
                    );
                    state.client = Some(Arc::new(client));
                    state.db_path = db_path.to_string();
                    applied = true;
                }
                Err(e) => {
                    warn!("Failed to open database {}: {}", db_path, e);
                    outcome = Err(e);
                }
            }
        }

        if !home_dir.is_empty() {
            debug!("Home directory set to {}", home_dir);
            state.home_dir = home_dir.to_string();
            applied = true;
        }

        state.read_only = read_only;

        if applied {
            state.phase = match state.phase {
                SessionPhase::Unconfigured => SessionPhase::Configured,
                _ => SessionPhase::Reconfigured,
            };
        }

        outcome
    }

    pub fn get_client(&self) -> Option<Arc<C>> {
        self.state.read().client.clone()
    }

    /// Returns `NotConnected` if no client is installed.
    pub fn require_client(&self) -> DbResult<Arc<C>> {
        self.get_client().ok_or(DatabaseError::NotConnected)
    }

    pub fn home_dir(&self) -> String {
        self.state.read().home_dir.clone()
    }

    pub fn db_path(&self) -> String {
        self.state.read().db_path.clone()
    }

    pub fn is_read_only(&self) -> bool {
        self.state.read().read_only
    }

    pub fn is_configured(&self) -> bool {
        matches!(
            self.state.read().phase,
            SessionPhase::Configured | SessionPhase::Reconfigured
        )
    }

    pub fn has_connection(&self) -> bool {
        self.state.read().client.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase
    }

    pub fn metadata(&self) -> ConnectionMetadata {
        let state = self.state.read();
        let home_dir = (!state.home_dir.is_empty()).then(|| state.home_dir.clone());
        match &state.client {
            Some(client) => ConnectionMetadata {
                connected: true,
                backend: Some(client.backend().to_string()),
                db_path: Some(state.db_path.clone()),
                home_dir,
                read_only: client.is_read_only(),
            },
            None => ConnectionMetadata {
                home_dir,
                read_only: state.read_only,
                ..ConnectionMetadata::disconnected()
            },
        }
    }

    /// Closes the connection and ends the session. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.write();
        if let Some(client) = state.client.take() {
            info!("Closing connection to {}", client.db_path());
            client.close();
        }
        state.phase = SessionPhase::Closed;
    }
}

impl<C: DatabaseClient> Default for SessionStore<C> {
    fn default() -> Self {
        Self::new()
    }
}
