//! Drop Monitor - 周期轮询丢包计数并按阈值告警
//!
//! 每个周期从设备工具读取原始计数，换算成周期增量，
//! 再与配置的阈值比较。

pub mod alert;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod model;
pub mod monitor;
pub mod parser;
pub mod scheduler;
pub mod source;
pub mod threshold;
pub mod tracker;

pub use alert::{Alert, AlertJournal, AlertRecord, AlertSink, FanoutSink, Severity, TracingSink};
pub use config::{MonitorKind, MonitorSettings, Overrides, SettingsFile};
pub use error::{MonitorError, Result};
pub use infra::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use model::{BridgeDomainRecord, CounterRecord, Endpoint, FlowDrops, Node, TrafficKind};
pub use monitor::{CycleReport, LptsMonitor, Monitor, StormMonitor};
pub use scheduler::{Schedule, SchedulePolicy};
pub use source::{BridgeDomainSource, NodeLister, NodeQuerySource};
pub use threshold::{AlertDecision, ThresholdConfig, ThresholdEvaluator, TriggerPolicy};
pub use tracker::{DeltaTracker, Observation};
