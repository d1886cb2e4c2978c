//! LPTS 硬件限速丢包监控 - 按线卡和流类型

use tracing::debug;

use super::{CycleReport, Monitor};
use crate::alert::{Alert, AlertSink};
use crate::error::MonitorError;
use crate::infra::command::CommandRunner;
use crate::source::NodeQuerySource;
use crate::threshold::{AlertDecision, ThresholdConfig, ThresholdEvaluator, TriggerPolicy};
use crate::tracker::DeltaTracker;

pub const MONITOR_NAME: &str = "LPTS";

/// `(节点十六进制 ID, 流类型)`
pub type LptsKey = (String, String);

/// Level 触发：流量持续越限时每个周期都告警
pub struct LptsMonitor<R> {
    source: NodeQuerySource<R>,
    tracker: DeltaTracker<LptsKey>,
    evaluator: ThresholdEvaluator,
    interval_secs: u64,
}

impl<R: CommandRunner> LptsMonitor<R> {
    pub fn new(source: NodeQuerySource<R>, thresholds: ThresholdConfig, interval_secs: u64) -> Self {
        Self {
            source,
            tracker: DeltaTracker::new(),
            evaluator: ThresholdEvaluator::new(thresholds, TriggerPolicy::Level),
            interval_secs: interval_secs.max(1),
        }
    }

    pub fn tracker(&self) -> &DeltaTracker<LptsKey> {
        &self.tracker
    }
}

impl<R: CommandRunner> Monitor for LptsMonitor<R> {
    fn name(&self) -> &'static str {
        MONITOR_NAME
    }

    fn run_cycle(&mut self, sink: &mut dyn AlertSink) -> CycleReport {
        let mut report = CycleReport::default();

        let collection = match self.source.collect() {
            Ok(collection) => collection,
            Err(MonitorError::EmptyEntityList(_)) => {
                sink.emit(Alert::warning(MONITOR_NAME, "Could not get list of line cards"));
                report.failures += 1;
                return report;
            }
            Err(e) => {
                sink.emit(Alert::error(MONITOR_NAME, format!("Could not get list of line cards: {}", e)));
                report.failures += 1;
                return report;
            }
        };

        for failure in &collection.failures {
            debug!(node = %failure.node.name, zone = ?failure.zone, error = %failure.error, "Node drops unavailable");
            sink.emit(Alert::error(
                MONITOR_NAME,
                format!("Could not get LPTS drops for {}", failure.node.name),
            ));
            report.failures += 1;
        }

        for record in collection.records {
            // 无丢包的流不跟踪
            if record.value == 0 {
                continue;
            }
            report.records += 1;

            let flow = record.kind;
            let obs = self
                .tracker
                .observe((record.entity.id_hex.clone(), flow.clone()), record.value);

            if let Some(AlertDecision::Exceeded { limit, delta }) = self.evaluator.evaluate(&flow, &obs) {
                sink.emit(Alert::info(
                    MONITOR_NAME,
                    format!(
                        "LPTS drop threshold ({}) exceeded for flow type {} on {}, {} drops in last {} seconds.",
                        limit, flow, record.entity.name, delta, self.interval_secs
                    ),
                ));
                report.alerts += 1;
            }
        }

        debug!(?report, "LPTS cycle complete");
        report
    }
}
