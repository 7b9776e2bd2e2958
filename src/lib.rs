pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod messages;
pub mod models;
pub mod repl;
pub mod services;
