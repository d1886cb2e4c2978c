//! `alerts` 命令 - 查看告警日志中最近的记录

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::alert::{AlertJournal, AlertRecord};

#[derive(Args, Debug, Clone)]
pub struct AlertsArgs {
    /// 告警日志文件（默认: <data dir>/drop-monitor/alerts.jsonl）
    #[arg(long)]
    pub journal: Option<PathBuf>,

    /// 显示最近 N 条告警
    #[arg(long, short, default_value = "20")]
    pub limit: usize,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

pub fn handle_alerts(args: AlertsArgs) -> Result<()> {
    let journal = AlertJournal::new(args.journal.unwrap_or_else(AlertJournal::default_path));
    let records = journal.read_recent(args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No alerts recorded in {}", journal.path().display());
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

/// 每条记录一行：`<时间> <级别> [<监控>] <消息>`
pub fn format_record(record: &AlertRecord) -> String {
    format!(
        "{} {:<7} [{}] {}",
        record.ts.format("%Y-%m-%d %H:%M:%S"),
        record.severity,
        record.monitor,
        record.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{Alert, AlertSink};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    #[test]
    fn test_format_record() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap();
        let record = AlertRecord::from_alert(Alert::warning("LPTS", "Could not get list of line cards"), ts);
        assert_eq!(
            format_record(&record),
            "2026-03-01 12:30:05 warning [LPTS] Could not get list of line cards"
        );
    }

    #[test]
    fn test_handle_alerts_reads_journal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.jsonl");
        let mut journal = AlertJournal::new(&path);
        journal.emit(Alert::info("Storm", "drop exceeded"));

        let args = AlertsArgs {
            journal: Some(path),
            limit: 5,
            json: true,
        };
        assert!(handle_alerts(args).is_ok());
    }
}
