//! Drop Monitor CLI
//!
//! 轮询设备丢包计数，越限时告警

use anyhow::Result;
use clap::{Parser, Subcommand};
use drop_monitor::cli::{handle_alerts, handle_lpts, handle_storm, AlertsArgs, LptsArgs, StormArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dropmon")]
#[command(about = "Drop Monitor - 设备丢包计数轮询与阈值告警")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 监控各线卡、各流类型的 LPTS 限速丢包
    Lpts(LptsArgs),
    /// 监控各端点的桥域风暴控制丢包
    Storm(StormArgs),
    /// 查看告警日志中最近的告警
    Alerts(AlertsArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // RUST_LOG 可覆盖，例如 RUST_LOG=debug dropmon lpts
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drop_monitor=info,dropmon=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lpts(args) => handle_lpts(args).await?,
        Commands::Storm(args) => handle_storm(args).await?,
        Commands::Alerts(args) => handle_alerts(args)?,
    }

    Ok(())
}
