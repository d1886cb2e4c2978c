//! 数据源适配 - 从设备工具拉取原始计数
//!
//! 两种形态：[`NodeQuerySource`] 先枚举实体再逐表查询，
//! [`BridgeDomainSource`] 消费单条流式命令。

pub mod node_query;
pub mod streaming;

pub use node_query::{NodeCollection, NodeFailure, NodeLister, NodeQuerySource};
pub use streaming::BridgeDomainSource;
