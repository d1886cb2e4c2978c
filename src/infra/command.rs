//! 设备命令执行 - 阻塞调用平台 CLI 工具

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use tracing::{debug, error};

use crate::error::{MonitorError, Result};

/// 单条命令的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// 退出码，被信号终止时为 `None`
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 以给定 stdout 构造成功结果
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// 为数据源执行外部命令
pub trait CommandRunner {
    /// 执行到结束并收集输出
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// 执行命令，stdout 每产生一行就交给 `on_line`
    fn stream(&self, program: &str, args: &[String], on_line: &mut dyn FnMut(&str)) -> Result<()>;
}

/// 拼成 `program args...`，用于日志和错误信息
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 基于 `std::process::Command` 在本机执行
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %command_line(program, args), "Running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MonitorError::source_unavailable(command_line(program, args), e.to_string()))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn stream(&self, program: &str, args: &[String], on_line: &mut dyn FnMut(&str)) -> Result<()> {
        let cmd = command_line(program, args);
        debug!(command = %cmd, "Streaming command output");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MonitorError::source_unavailable(&cmd, e.to_string()))?;

        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        // 接口描述里可能有非 UTF-8 字节，按 lossy 处理，不中断读取
                        let line = String::from_utf8_lossy(&buf);
                        on_line(line.trim_end_matches(['\r', '\n']));
                    }
                    Err(e) => {
                        error!(command = %cmd, error = %e, "Failed reading command output");
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(MonitorError::source_unavailable(&cmd, e.to_string()));
                    }
                }
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(MonitorError::source_unavailable(
                cmd,
                format!("exited with {}", status),
            ));
        }
        Ok(())
    }
}
