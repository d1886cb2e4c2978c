//! 告警 sink trait 与内置实现

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// 告警级别，对应监控使用的 syslog 级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.pad(s)
    }
}

/// 交给 sink 的一条已渲染消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    /// 来源监控（`LPTS`、`Storm`）
    pub monitor: String,
    pub message: String,
}

impl Alert {
    pub fn new(severity: Severity, monitor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            monitor: monitor.into(),
            message: message.into(),
        }
    }

    pub fn info(monitor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, monitor, message)
    }

    pub fn warning(monitor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, monitor, message)
    }

    pub fn error(monitor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, monitor, message)
    }
}

/// 只追加的告警目的地
pub trait AlertSink {
    fn emit(&mut self, alert: Alert);
}

/// 记录型 sink
impl AlertSink for Vec<Alert> {
    fn emit(&mut self, alert: Alert) {
        self.push(alert);
    }
}

/// 通过 `tracing` 按对应级别输出
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for TracingSink {
    fn emit(&mut self, alert: Alert) {
        match alert.severity {
            Severity::Info => info!(monitor = %alert.monitor, "{}", alert.message),
            Severity::Warning => warn!(monitor = %alert.monitor, "{}", alert.message),
            Severity::Error => error!(monitor = %alert.monitor, "{}", alert.message),
        }
    }
}

/// 依次转发给每个内部 sink
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl AlertSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AlertSink for FanoutSink {
    fn emit(&mut self, alert: Alert) {
        if let Some((last, rest)) = self.sinks.split_last_mut() {
            for sink in rest {
                sink.emit(alert.clone());
            }
            last.emit(alert);
        }
    }
}
