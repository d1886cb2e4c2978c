//! 监控核心共用的错误类型

use std::io;
use thiserror::Error;

/// 采集或配置监控时产生的错误
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 外部调用失败，或输出无法使用
    #[error("source unavailable ({command}): {reason}")]
    SourceUnavailable { command: String, reason: String },

    /// 实体枚举结果为空
    #[error("empty entity list: {0}")]
    EmptyEntityList(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MonitorError::Config(msg.into())
    }

    pub fn source_unavailable(command: impl Into<String>, reason: impl Into<String>) -> Self {
        MonitorError::SourceUnavailable {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
