//! `lpts` / `storm` 命令 - 在周期调度器上运行监控

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::alert::{AlertJournal, FanoutSink, TracingSink};
use crate::config::{MonitorKind, MonitorSettings, Overrides, SettingsFile};
use crate::infra::SystemCommandRunner;
use crate::monitor::{LptsMonitor, Monitor, StormMonitor};
use crate::scheduler::{self, Schedule};
use crate::source::{BridgeDomainSource, NodeQuerySource};

/// 所有监控共用的参数
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// 轮询间隔（秒，默认 60，最小 1）
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// 每个间隔的丢包阈值
    #[arg(long = "thresholds", short = 't', num_args = 1.., allow_negative_numbers = true)]
    pub thresholds: Vec<i64>,

    /// 每个周期后固定休眠一个间隔，不合并超时周期
    #[arg(long)]
    pub fixed_sleep: bool,

    /// 同时把告警追加到该 JSONL 日志
    #[arg(long)]
    pub journal: Option<PathBuf>,

    /// JSON 配置文件（默认: <config dir>/drop-monitor/<monitor>.json）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 只执行一个周期后退出
    #[arg(long)]
    pub once: bool,
}

/// 各线卡的 LPTS 硬件限速丢包
#[derive(Args, Debug, Clone, Default)]
pub struct LptsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// 流类型，按位置与 --thresholds 配对，必须包含 `*`
    #[arg(long = "flows", short = 'f', num_args = 1..)]
    pub flows: Vec<String>,
}

/// 桥域广播/组播/未知单播丢包。
/// 给一个阈值用于全部类别，或给三个分别对应各类别。
#[derive(Args, Debug, Clone, Default)]
pub struct StormArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn handle_lpts(args: LptsArgs) -> Result<()> {
    run_monitor(MonitorKind::Lpts, args.common, args.flows).await
}

pub async fn handle_storm(args: StormArgs) -> Result<()> {
    run_monitor(MonitorKind::Storm, args.common, Vec::new()).await
}

async fn run_monitor(kind: MonitorKind, common: CommonArgs, flows: Vec<String>) -> Result<()> {
    let file = SettingsFile::discover(kind, common.config.as_deref())
        .context("Failed to load settings file")?;
    let overrides = Overrides {
        interval: common.interval,
        flows,
        thresholds: common.thresholds,
        fixed_sleep: common.fixed_sleep,
        journal: common.journal,
    };
    let settings = MonitorSettings::resolve(kind, file, overrides).context("Invalid monitor settings")?;

    let mut sink = FanoutSink::new().with(TracingSink::new());
    if let Some(path) = &settings.journal {
        sink = sink.with(AlertJournal::new(path));
    }

    let mut monitor = build_monitor(&settings);
    let name = monitor.name();

    if common.once {
        let report = monitor.run_cycle(&mut sink);
        info!(monitor = name, ?report, "Single cycle complete");
        return Ok(());
    }

    info!(
        monitor = name,
        interval_secs = settings.interval_secs,
        schedule = ?settings.schedule,
        "Monitor started"
    );

    let schedule = Schedule::new(settings.interval_secs, settings.schedule, Instant::now());
    tokio::select! {
        _ = scheduler::run(schedule, || {
            monitor.run_cycle(&mut sink);
        }) => {}
        _ = shutdown_signal() => {
            info!(monitor = name, "Termination signal received, stopping");
        }
    }

    Ok(())
}

fn build_monitor(settings: &MonitorSettings) -> Box<dyn Monitor> {
    let runner = SystemCommandRunner::new();
    match settings.kind {
        MonitorKind::Lpts => Box::new(LptsMonitor::new(
            NodeQuerySource::new(runner),
            settings.thresholds.clone(),
            settings.interval_secs,
        )),
        MonitorKind::Storm => Box::new(StormMonitor::new(
            BridgeDomainSource::new(runner),
            settings.thresholds.clone(),
            settings.interval_secs,
        )),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
