/// Everything a command handler needs to know about the message that
/// triggered it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub guild_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub options: Vec<String>,
}

impl CommandContext {
    pub fn new(guild_id: &str, channel_id: &str, user_id: &str, options: Vec<String>) -> Self {
        CommandContext {
            guild_id: guild_id.to_string(),
            channel_id: channel_id.to_string(),
            user_id: user_id.to_string(),
            options,
        }
    }
}
