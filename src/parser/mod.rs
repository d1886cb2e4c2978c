//! 实体解析 - 设备命令输出转为类型化计数记录

pub mod bridge_domain;
pub mod pifib;

pub use bridge_domain::{classify, BridgeDomainParser, LineKind};
pub use pifib::{parse_node_list, CounterTable, COUNTER_TABLES};
