//! CLI 命令处理

pub mod alerts;
pub mod watch;

pub use alerts::{handle_alerts, AlertsArgs};
pub use watch::{handle_lpts, handle_storm, CommonArgs, LptsArgs, StormArgs};
