//! Voice session lifecycle: per-guild session state, the sequential
//! playback loop, inactivity tracking and teardown.

pub mod connection;
pub mod error;
pub mod playback;
pub mod timer;

pub use connection::{PcmFileConnector, VoiceConnector};
pub use error::SessionError;
pub use playback::{spawn_playback_loop, PlaybackContext, PlaybackDeps};
pub use timer::InactivityTimer;

use crate::audio::VoiceConnection;
use crate::media::PlaybackQueue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TokioMutex, Notify};
use tracing::{debug, info};

const LOG_TARGET: &str = "voxbot::session";

/// All state the bot keeps for one guild's voice presence.
///
/// A session is single-use: once torn down it stays closed, and the registry
/// hands out a fresh session on the next request for the guild.
pub struct VoiceSession {
    guild_id: String,
    queue: PlaybackQueue,
    connection: TokioMutex<Option<Arc<dyn VoiceConnection>>>,
    playback_active: AtomicBool,
    closed: AtomicBool,
    teardown: Notify,
    timer: InactivityTimer,
}

impl VoiceSession {
    pub fn new(guild_id: &str) -> Arc<Self> {
        Arc::new(VoiceSession {
            guild_id: guild_id.to_string(),
            queue: PlaybackQueue::new(),
            connection: TokioMutex::new(None),
            playback_active: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            teardown: Notify::new(),
            timer: InactivityTimer::new(),
        })
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn timer(&self) -> &InactivityTimer {
        &self.timer
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn is_playback_active(&self) -> bool {
        self.playback_active.load(Ordering::SeqCst)
    }

    /// Claims the single playback slot. Returns false if a loop already
    /// runs for this session.
    pub(crate) fn try_claim_playback(&self) -> bool {
        self.playback_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release_playback(&self) {
        self.playback_active.store(false, Ordering::SeqCst);
    }

    /// Resolves until the next teardown notification. Callers must pair
    /// this with an `is_closed` check, since a notification sent before the
    /// wait started is not replayed.
    pub(crate) async fn wait_teardown(&self) {
        self.teardown.notified().await;
    }

    /// Returns the live connection, establishing one through `connector` if
    /// the session has none yet.
    pub async fn ensure_connected(
        &self,
        connector: &Arc<dyn VoiceConnector>,
        channel_id: &str,
    ) -> Result<Arc<dyn VoiceConnection>, SessionError> {
        let mut guard = self.connection.lock().await;
        if let Some(existing) = guard.as_ref() {
            debug!(target: LOG_TARGET, guild_id = %self.guild_id, "Reusing existing voice connection");
            return Ok(existing.clone());
        }
        let connection = connector.connect(&self.guild_id, channel_id).await?;
        *guard = Some(connection.clone());
        Ok(connection)
    }

    pub async fn current_connection(&self) -> Option<Arc<dyn VoiceConnection>> {
        self.connection.lock().await.clone()
    }

    /// Closes the session: cancels the timer, interrupts the playback loop,
    /// drops pending items and releases the connection.
    ///
    /// Idempotent. Returns true only on the call that actually released a
    /// live connection.
    pub async fn teardown(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!(target: LOG_TARGET, guild_id = %self.guild_id, "Teardown already performed");
            return false;
        }
        info!(target: LOG_TARGET, guild_id = %self.guild_id, "Tearing down session");

        self.timer.cancel();
        self.teardown.notify_waiters();
        self.queue.clear();

        match self.connection.lock().await.take() {
            Some(connection) => {
                connection.disconnect().await;
                true
            }
            None => false,
        }
    }
}

/// Guild id to session map shared by all command handlers.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<VoiceSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, guild_id: &str) -> Option<Arc<VoiceSession>> {
        self.sessions.lock().unwrap().get(guild_id).cloned()
    }

    /// Returns the guild's session, replacing a torn-down one with a fresh
    /// session.
    pub fn get_or_create(&self, guild_id: &str) -> Arc<VoiceSession> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(guild_id) {
            Some(session) if !session.is_closed() => session.clone(),
            _ => {
                let session = VoiceSession::new(guild_id);
                sessions.insert(guild_id.to_string(), session.clone());
                session
            }
        }
    }

    pub fn remove(&self, guild_id: &str) -> Option<Arc<VoiceSession>> {
        self.sessions.lock().unwrap().remove(guild_id)
    }
}
