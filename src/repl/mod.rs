//! Line-oriented interpreter in front of the services

pub mod commands;
pub mod handlers;
pub mod output;
pub mod span;
pub mod state;

pub use commands::{Command, ParseFailure};
pub use handlers::{Flow, Repl};
pub use state::Session;
