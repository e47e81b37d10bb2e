//! LunaLink terminal client: wires the notification stack to a terminal,
//! keeps the realtime channel connected and runs user commands.

pub mod actions;
pub mod app;
pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod console;
pub mod realtime_handler;
pub mod shutdown;

pub use bootstrap::init_foundation;
pub use realtime_handler::run as run_realtime_handler;
