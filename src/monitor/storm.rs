//! 桥域广播风暴丢包监控 - 按端点

use tracing::debug;

use super::{CycleReport, Monitor};
use crate::alert::{Alert, AlertSink};
use crate::infra::command::CommandRunner;
use crate::model::{Endpoint, TrafficKind};
use crate::source::BridgeDomainSource;
use crate::threshold::{AlertDecision, ThresholdConfig, ThresholdEvaluator, TriggerPolicy};
use crate::tracker::DeltaTracker;

pub const MONITOR_NAME: &str = "Storm";

/// `(桥组:桥域, 端点, 流量类别)`
pub type StormKey = (String, Endpoint, TrafficKind);

/// Edge 触发：越限期间告警，回落到阈值以下时再通知一次
pub struct StormMonitor<R> {
    source: BridgeDomainSource<R>,
    tracker: DeltaTracker<StormKey>,
    evaluator: ThresholdEvaluator,
    interval_secs: u64,
}

impl<R: CommandRunner> StormMonitor<R> {
    pub fn new(source: BridgeDomainSource<R>, thresholds: ThresholdConfig, interval_secs: u64) -> Self {
        Self {
            source,
            tracker: DeltaTracker::new(),
            evaluator: ThresholdEvaluator::new(thresholds, TriggerPolicy::Edge),
            interval_secs: interval_secs.max(1),
        }
    }

    pub fn tracker(&self) -> &DeltaTracker<StormKey> {
        &self.tracker
    }
}

fn render(
    kind: TrafficKind,
    decision: AlertDecision,
    interval_secs: u64,
    group: &str,
    endpoint: &Endpoint,
) -> String {
    match decision {
        AlertDecision::Exceeded { limit, delta } => format!(
            "{} traffic drop exceeded threshold {}p/{}s on {} {} Exact value: {}",
            kind.label(),
            limit,
            interval_secs,
            group,
            endpoint,
            delta
        ),
        AlertDecision::Cleared { limit } => format!(
            "{} traffic drop is below threshold {}p/{}s on {} {}",
            kind.label(),
            limit,
            interval_secs,
            group,
            endpoint
        ),
    }
}

impl<R: CommandRunner> Monitor for StormMonitor<R> {
    fn name(&self) -> &'static str {
        MONITOR_NAME
    }

    fn run_cycle(&mut self, sink: &mut dyn AlertSink) -> CycleReport {
        let Self {
            source,
            tracker,
            evaluator,
            interval_secs,
        } = self;
        let mut report = CycleReport::default();

        let result = source.collect(&mut |record| {
            for counter in record.counters() {
                report.records += 1;
                let (group, endpoint) = counter.entity;
                let obs = tracker.observe((group.clone(), endpoint.clone(), counter.kind), counter.value);

                if let Some(decision) = evaluator.evaluate(counter.kind.key(), &obs) {
                    sink.emit(Alert::info(
                        MONITOR_NAME,
                        render(counter.kind, decision, *interval_secs, &group, &endpoint),
                    ));
                    report.alerts += 1;
                }
            }
        });

        if let Err(e) = result {
            debug!(error = %e, records = report.records, "Bridge-domain detail unavailable");
            let message = if report.records == 0 {
                "Could not get bridge-domain details".to_string()
            } else {
                // 已处理的计数保留，只报告输出被截断
                format!(
                    "Bridge-domain details truncated after {} counter readings: {}",
                    report.records, e
                )
            };
            sink.emit(Alert::error(MONITOR_NAME, message));
            report.failures += 1;
        }

        debug!(?report, "Storm cycle complete");
        report
    }
}
