use async_trait::async_trait;
use tracing::debug;

const LOG_TARGET: &str = "voxbot::ui::notifier";

/// Outbound user-visible notices, addressed to a text channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel_id: &str, message: &str);
}

/// Notifier that prints notices to stdout, one line per notice.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        ConsoleNotifier
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, channel_id: &str, message: &str) {
        debug!(target: LOG_TARGET, channel_id, "Sending notice");
        println!("[{}] {}", channel_id, message);
    }
}
