//! 周期调度 - 固定名义间隔，超时的周期合并补齐

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 每个周期结束后如何确定下一次唤醒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulePolicy {
    /// 目标时间按整数个间隔推进，超时错过的 tick 合并为一次
    #[default]
    Coalescing,
    /// 从周期开始时刻起睡满一个间隔。
    /// 轮询慢时会漂移，只在显式选择时使用。
    FixedSleep,
}

/// 周期循环的截止时间记录
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    target: Instant,
    policy: SchedulePolicy,
}

impl Schedule {
    /// `interval_secs` 小于 1 时按 1 处理
    pub fn new(interval_secs: u64, policy: SchedulePolicy, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            target: start,
            policy,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 在 `cycle_started` 开始、`now` 结束的周期之后，计算下一次唤醒时间
    pub fn next_wake(&mut self, cycle_started: Instant, now: Instant) -> Instant {
        match self.policy {
            SchedulePolicy::Coalescing => {
                let elapsed = now.saturating_duration_since(self.target);
                let intervals = intervals_to_advance(elapsed, self.interval);
                if intervals > 1 {
                    warn!(
                        skipped = intervals - 1,
                        interval_secs = self.interval.as_secs(),
                        "Cycle overran its interval, coalescing missed ticks"
                    );
                }
                self.target += self.interval * intervals;
            }
            SchedulePolicy::FixedSleep => {
                self.target = cycle_started + self.interval;
            }
        }

        debug!(
            sleep_ms = self.target.saturating_duration_since(now).as_millis() as u64,
            "Next cycle scheduled"
        );
        self.target
    }
}

/// 覆盖 `elapsed` 所需的整间隔数（向上取整，至少 1），溢出时饱和到 `u32::MAX`
fn intervals_to_advance(elapsed: Duration, interval: Duration) -> u32 {
    let interval = interval.as_nanos().max(1);
    let n = elapsed.as_nanos().div_ceil(interval).max(1);
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// 按 `schedule` 无限执行 `cycle`。周期之间不重叠，正在执行的周期总会
/// 在下一次休眠前完成。丢弃该 future 即停止。
pub async fn run<F>(mut schedule: Schedule, mut cycle: F)
where
    F: FnMut(),
{
    loop {
        let started = Instant::now();
        cycle();
        let wake = schedule.next_wake(started, Instant::now());
        tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;
    }
}
