//! 监控配置 - JSON 配置文件 + 命令行覆盖

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::scheduler::SchedulePolicy;
use crate::threshold::{ThresholdConfig, WILDCARD};

pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_LPTS_THRESHOLD: i64 = 10;
pub const DEFAULT_STORM_THRESHOLD: i64 = 100;

/// 配置所属的监控类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorKind {
    Lpts,
    Storm,
}

impl MonitorKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            MonitorKind::Lpts => "lpts",
            MonitorKind::Storm => "storm",
        }
    }
}

/// 从磁盘读取的配置，所有字段可选
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub interval: Option<u64>,
    pub flows: Option<Vec<String>>,
    pub thresholds: Option<Vec<i64>>,
    pub schedule: Option<SchedulePolicy>,
    pub journal: Option<PathBuf>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "Settings file loaded");
        Ok(settings)
    }

    /// `<config dir>/drop-monitor/<monitor>.json`
    pub fn default_path(kind: MonitorKind) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join("drop-monitor")
                .join(format!("{}.json", kind.file_stem()))
        })
    }

    /// 指定了 `explicit` 则加载它（必须存在），否则加载存在的默认路径
    pub fn discover(kind: MonitorKind, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path(kind) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// 命令行传入的值，`None` 或空表示未指定
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval: Option<u64>,
    pub flows: Vec<String>,
    pub thresholds: Vec<i64>,
    pub fixed_sleep: bool,
    pub journal: Option<PathBuf>,
}

/// 启动时解析完成的配置，构建后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub kind: MonitorKind,
    pub interval_secs: u64,
    pub schedule: SchedulePolicy,
    pub thresholds: ThresholdConfig,
    pub journal: Option<PathBuf>,
}

impl MonitorSettings {
    /// 合并配置文件与命令行参数并校验
    pub fn resolve(kind: MonitorKind, file: SettingsFile, overrides: Overrides) -> Result<Self> {
        let interval_secs = overrides
            .interval
            .or(file.interval)
            .unwrap_or(DEFAULT_INTERVAL_SECS)
            .max(1);

        let schedule = if overrides.fixed_sleep {
            SchedulePolicy::FixedSleep
        } else {
            file.schedule.unwrap_or_default()
        };

        let thresholds = pick(overrides.thresholds, file.thresholds);
        let thresholds = match kind {
            MonitorKind::Lpts => {
                let flows = pick(overrides.flows, file.flows).unwrap_or_else(|| vec![WILDCARD.to_string()]);
                let limits = thresholds.unwrap_or_else(|| vec![DEFAULT_LPTS_THRESHOLD]);
                ThresholdConfig::from_lists(&flows, &limits)?
            }
            MonitorKind::Storm => {
                if !overrides.flows.is_empty() || file.flows.is_some() {
                    return Err(MonitorError::config(
                        "flow types apply to the LPTS monitor only",
                    ));
                }
                let limits = thresholds.unwrap_or_else(|| vec![DEFAULT_STORM_THRESHOLD]);
                ThresholdConfig::for_traffic_kinds(&limits)?
            }
        };

        Ok(Self {
            kind,
            interval_secs,
            schedule,
            thresholds,
            journal: overrides.journal.or(file.journal),
        })
    }
}

fn pick<T>(cli: Vec<T>, file: Option<Vec<T>>) -> Option<Vec<T>> {
    if cli.is_empty() {
        file
    } else {
        Some(cli)
    }
}
