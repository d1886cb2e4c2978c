//! 监控器 - 每个周期执行一次 采集/解析/跟踪/判定

mod lpts;
mod storm;

pub use lpts::{LptsKey, LptsMonitor};
pub use storm::{StormKey, StormMonitor};

use crate::alert::AlertSink;

/// 单个周期的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 输入跟踪器的读数
    pub records: usize,
    /// 发出的阈值告警
    pub alerts: usize,
    /// 上报的数据源失败
    pub failures: usize,
}

/// 由调度器驱动的周期计数监控
pub trait Monitor {
    /// 每条告警携带的标签
    fn name(&self) -> &'static str;

    /// 执行一个完整周期。数据源失败上报给 `sink`，不会终止进程。
    fn run_cycle(&mut self, sink: &mut dyn AlertSink) -> CycleReport;
}
