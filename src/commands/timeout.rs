use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use crate::commands::registry::Command;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const LOG_TARGET: &str = "voxbot::commands::timeout";

/// Changes the inactivity timeout, in minutes, and re-arms the timer for an
/// open session.
pub struct TimeoutCommand;

#[async_trait]
impl Command for TimeoutCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        if ctx.options.len() != 1 {
            bot.notifier()
                .notify(
                    &ctx.channel_id,
                    "Please specify a timeout duration: !timeout 30 (This will set a timeout for 30 minutes)",
                )
                .await;
            return;
        }

        let minutes: u64 = match ctx.options[0].parse() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                bot.notifier()
                    .notify(&ctx.channel_id, "Please input a number")
                    .await;
                return;
            }
        };

        bot.set_inactivity_timeout(Duration::from_secs(minutes.saturating_mul(60)));
        info!(target: LOG_TARGET, minutes, "Inactivity timeout updated");

        if let Some(session) = bot.sessions().get(&ctx.guild_id) {
            if !session.is_closed() {
                bot.arm_inactivity_timer(&session, &ctx.channel_id);
            }
        }

        bot.notifier()
            .notify(
                &ctx.channel_id,
                &format!("Timeout duration set to {} minutes.", minutes),
            )
            .await;
    }

    fn help(&self) -> &str {
        "!timeout - Set a timeout for the bot that will trigger it to leave on inactivity"
    }
}
