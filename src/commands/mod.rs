//! Command layer: message parsing, the handler registry and the built-in
//! commands.

pub mod context;
pub mod controller;
pub mod join;
pub mod leave;
pub mod play;
pub mod registry;
pub mod simple;
pub mod timeout;

pub use context::CommandContext;
pub use controller::{BotController, ControllerConfig};
pub use join::JoinCommand;
pub use leave::LeaveCommand;
pub use play::PlayCommand;
pub use registry::{Command, CommandRegistry};
pub use simple::{HelpCommand, PingCommand};
pub use timeout::TimeoutCommand;
