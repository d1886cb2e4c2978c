//! 告警投递 - sink trait、tracing 输出与磁盘日志

pub mod journal;
pub mod sink;

pub use journal::{AlertJournal, AlertRecord};
pub use sink::{Alert, AlertSink, FanoutSink, Severity, TracingSink};
