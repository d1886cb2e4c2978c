//! 基础设施 - 外部命令执行

pub mod command;

pub use command::{command_line, CommandOutput, CommandRunner, SystemCommandRunner};
