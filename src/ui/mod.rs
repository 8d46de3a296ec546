//! User interface: command-line argument parsing and outbound notices.

pub mod cli;
pub mod notifier;
#[cfg(test)]
mod tests;

pub use cli::{Args, Cli};
pub use notifier::{ConsoleNotifier, Notifier};
