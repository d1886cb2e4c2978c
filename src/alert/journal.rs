//! 告警日志 - 只追加的 JSONL 文件

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::sink::{Alert, AlertSink, Severity};
use crate::error::Result;

/// 日志中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub ts: DateTime<Utc>,
    pub severity: Severity,
    pub monitor: String,
    pub message: String,
}

impl AlertRecord {
    pub fn from_alert(alert: Alert, ts: DateTime<Utc>) -> Self {
        Self {
            ts,
            severity: alert.severity,
            monitor: alert.monitor,
            message: alert.message,
        }
    }
}

const MAX_RECORDS: usize = 2000;
const KEEP_AFTER_COMPACTION: usize = 1000;
const COMPACTION_CHECK_INTERVAL: usize = 50;
/// 平均行长估算值，用文件大小估算记录数
const AVG_RECORD_BYTES: u64 = 160;

pub struct AlertJournal {
    path: PathBuf,
    writes: usize,
}

impl AlertJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: 0,
        }
    }

    /// `~/.local/share/drop-monitor/alerts.jsonl` 或平台对应目录
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drop-monitor")
            .join("alerts.jsonl")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 持排他锁追加一条记录
    pub fn append(&mut self, record: &AlertRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.lock_exclusive()?;
        let written = writeln!(file, "{}", serde_json::to_string(record)?);
        file.unlock()?;
        written?;

        self.writes += 1;
        if self.writes % COMPACTION_CHECK_INTERVAL == 0 {
            self.maybe_compact()?;
        }
        Ok(())
    }

    /// 按文件顺序返回最后 `n` 条，无法解析的行跳过
    pub fn read_recent(&self, n: usize) -> Vec<AlertRecord> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let records: Vec<AlertRecord> = BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();

        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }

    fn maybe_compact(&self) -> Result<()> {
        let estimated = fs::metadata(&self.path)?.len() / AVG_RECORD_BYTES;
        if estimated as usize > MAX_RECORDS {
            self.compact()?;
        }
        Ok(())
    }

    /// 只保留最新的记录
    pub fn compact(&self) -> Result<()> {
        let file = File::open(&self.path)?;
        file.lock_exclusive()?;

        let records: Vec<String> = BufReader::new(&file)
            .lines()
            .map_while(|line| line.ok())
            .collect();

        if records.len() <= MAX_RECORDS {
            file.unlock()?;
            return Ok(());
        }

        let start = records.len().saturating_sub(KEEP_AFTER_COMPACTION);
        let temp_path = self.path.with_extension("tmp");
        {
            let mut temp = File::create(&temp_path)?;
            for line in &records[start..] {
                writeln!(temp, "{}", line)?;
            }
        }
        fs::rename(&temp_path, &self.path)?;
        file.unlock()?;
        Ok(())
    }
}

impl AlertSink for AlertJournal {
    fn emit(&mut self, alert: Alert) {
        let record = AlertRecord::from_alert(alert, Utc::now());
        if let Err(e) = self.append(&record) {
            warn!(path = %self.path.display(), error = %e, "Failed to write alert journal");
        }
    }
}
