use crate::audio::AudioFrameEncoder;
use crate::commands::context::CommandContext;
use crate::commands::registry::CommandRegistry;
use crate::commands::join::JoinCommand;
use crate::commands::leave::LeaveCommand;
use crate::commands::play::PlayCommand;
use crate::commands::simple::{HelpCommand, PingCommand};
use crate::commands::timeout::TimeoutCommand;
use crate::media::{DownloadSupervisor, MediaFetcher, Transcoder};
use crate::session::{PlaybackDeps, SessionRegistry, VoiceConnector, VoiceSession};
use crate::ui::Notifier;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "voxbot::commands::controller";

/// Tunables the controller is constructed with.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub command_prefix: String,
    pub inactivity_timeout: Duration,
    pub poll_interval: Duration,
    pub max_concurrent_downloads: usize,
}

/// Central bot state: the command registry, per-guild sessions and the
/// collaborators playback streams through.
pub struct BotController {
    registry: CommandRegistry,
    sessions: SessionRegistry,
    supervisor: DownloadSupervisor,
    encoder: Arc<dyn AudioFrameEncoder>,
    connector: Arc<dyn VoiceConnector>,
    notifier: Arc<dyn Notifier>,
    command_prefix: String,
    inactivity_timeout: Mutex<Duration>,
    poll_interval: Duration,
}

impl BotController {
    pub fn new(
        config: ControllerConfig,
        fetcher: Arc<dyn MediaFetcher>,
        transcoder: Arc<dyn Transcoder>,
        encoder: Arc<dyn AudioFrameEncoder>,
        connector: Arc<dyn VoiceConnector>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let mut registry = CommandRegistry::new();
        registry.register("play", Arc::new(PlayCommand));
        registry.register("join", Arc::new(JoinCommand));
        registry.register("leave", Arc::new(LeaveCommand));
        registry.register("timeout", Arc::new(TimeoutCommand));
        registry.register("ping", Arc::new(PingCommand));
        registry.register("help", Arc::new(HelpCommand));

        Arc::new(BotController {
            registry,
            sessions: SessionRegistry::new(),
            supervisor: DownloadSupervisor::new(
                fetcher,
                transcoder,
                config.max_concurrent_downloads,
            ),
            encoder,
            connector,
            notifier,
            command_prefix: config.command_prefix,
            inactivity_timeout: Mutex::new(config.inactivity_timeout),
            poll_interval: config.poll_interval,
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn supervisor(&self) -> &DownloadSupervisor {
        &self.supervisor
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn connector(&self) -> &Arc<dyn VoiceConnector> {
        &self.connector
    }

    pub fn inactivity_timeout(&self) -> Duration {
        *self.inactivity_timeout.lock().unwrap()
    }

    pub fn set_inactivity_timeout(&self, timeout: Duration) {
        *self.inactivity_timeout.lock().unwrap() = timeout;
    }

    /// Collaborator bundle the playback loop runs against.
    pub fn playback_deps(&self) -> PlaybackDeps {
        PlaybackDeps {
            encoder: self.encoder.clone(),
            connector: self.connector.clone(),
            notifier: self.notifier.clone(),
            poll_interval: self.poll_interval,
        }
    }

    /// Parses `content` and spawns one handler task per recognized command
    /// token, in token order. Unknown commands produce a single notice.
    ///
    /// The returned handles are only joined by tests.
    pub fn dispatch_message(
        self: &Arc<Self>,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
        content: &str,
    ) -> Vec<JoinHandle<()>> {
        let actions = parse_actions(&self.command_prefix, content);
        if actions.is_empty() {
            return Vec::new();
        }
        debug!(target: LOG_TARGET, guild_id, count = actions.len(), "Dispatching command actions");

        // Any command traffic counts as activity for an open session.
        if let Some(session) = self.sessions.get(guild_id) {
            if !session.is_closed() {
                self.arm_inactivity_timer(&session, channel_id);
            }
        }

        let mut handles = Vec::new();
        for action in actions {
            let ctx = CommandContext::new(guild_id, channel_id, user_id, action.options);
            match self.registry.get(&action.name) {
                Some(command) => {
                    let bot = self.clone();
                    handles.push(tokio::spawn(async move {
                        command.execute(bot, ctx).await;
                    }));
                }
                None => {
                    warn!(target: LOG_TARGET, command = %action.name, "Unknown command");
                    let notifier = self.notifier.clone();
                    let channel_id = channel_id.to_string();
                    let prefix = self.command_prefix.clone();
                    let name = action.name;
                    handles.push(tokio::spawn(async move {
                        notifier
                            .notify(&channel_id, &format!("Unknown command: {}{}", prefix, name))
                            .await;
                    }));
                }
            }
        }
        handles
    }

    /// Re-arms the session's inactivity timer with the current timeout. On
    /// expiry the session is torn down, unregistered and the user notified.
    pub fn arm_inactivity_timer(
        self: &Arc<Self>,
        session: &Arc<VoiceSession>,
        channel_id: &str,
    ) {
        let timeout = self.inactivity_timeout();
        let bot = self.clone();
        let expiring = session.clone();
        let channel_id = channel_id.to_string();

        session.timer().reset(timeout, move || async move {
            info!(target: LOG_TARGET, guild_id = %expiring.guild_id(), "Inactivity timeout reached");
            let released = expiring.teardown().await;
            if let Some(current) = bot.sessions.get(expiring.guild_id()) {
                // Only unregister the session the timer belonged to.
                if Arc::ptr_eq(&current, &expiring) {
                    bot.sessions.remove(expiring.guild_id());
                }
            }
            if released {
                bot.notifier
                    .notify(&channel_id, "✅ Left the voice channel due to inactivity.")
                    .await;
            }
        });
    }
}

/// One command token with the non-command tokens that followed it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedAction {
    pub name: String,
    pub options: Vec<String>,
}

/// Splits a message into command actions. Tokens carrying the prefix open a
/// new action; other tokens become options of the most recent action.
/// Tokens before the first command token are ignored.
pub(crate) fn parse_actions(prefix: &str, content: &str) -> Vec<ParsedAction> {
    let mut actions: Vec<ParsedAction> = Vec::new();
    for token in content.split_whitespace() {
        if let Some(name) = token.strip_prefix(prefix) {
            if name.is_empty() {
                continue;
            }
            actions.push(ParsedAction {
                name: name.to_lowercase(),
                options: Vec::new(),
            });
        } else if let Some(current) = actions.last_mut() {
            current.options.push(token.to_string());
        }
    }
    actions
}
