//! 监控实体与计数记录

use std::fmt;

/// 节点枚举命令报告的线卡
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// 硬件节点 ID，带 `0x` 前缀的十六进制
    pub id_hex: String,
    /// 完整节点名（如 `0/0/CPU0`）
    pub name: String,
}

impl Node {
    pub fn new(id_hex: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id_hex: id_hex.into(),
            name: name.into(),
        }
    }

    /// 十进制节点 ID，计数命令需要这种格式
    pub fn decimal_id(&self) -> Option<u64> {
        let digits = self
            .id_hex
            .strip_prefix("0x")
            .or_else(|| self.id_hex.strip_prefix("0X"))
            .unwrap_or(&self.id_hex);
        u64::from_str_radix(digits, 16).ok()
    }
}

/// 桥域内的接入点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AccessCircuit(String),
    Pseudowire { neighbor: String, pw_id: String },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::AccessCircuit(name) => write!(f, "{}", name),
            Endpoint::Pseudowire { neighbor, pw_id } => {
                write!(f, "neighbor: {}, ID: {}", neighbor, pw_id)
            }
        }
    }
}

/// 每个桥域端点统计的泛洪流量类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficKind {
    Broadcast,
    Multicast,
    UnknownUnicast,
}

impl TrafficKind {
    pub const ALL: [TrafficKind; 3] = [
        TrafficKind::Broadcast,
        TrafficKind::Multicast,
        TrafficKind::UnknownUnicast,
    ];

    /// 阈值匹配键
    pub fn key(self) -> &'static str {
        match self {
            TrafficKind::Broadcast => "broadcast",
            TrafficKind::Multicast => "multicast",
            TrafficKind::UnknownUnicast => "unknown-unicast",
        }
    }

    /// 告警消息中的名称
    pub fn label(self) -> &'static str {
        match self {
            TrafficKind::Broadcast => "Broadcast",
            TrafficKind::Multicast => "Multicast",
            TrafficKind::UnknownUnicast => "Unknown unicast",
        }
    }
}

/// 某个跟踪序列的一次原始读数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord<E, K> {
    pub entity: E,
    pub kind: K,
    pub value: u64,
}

/// 单个节点上某流类型的丢包数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDrops {
    pub flow: String,
    pub drops: u64,
}

/// 已归属到桥域端点的计数行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeDomainRecord {
    /// `<group>:<bridge-domain>`
    pub group: String,
    pub endpoint: Endpoint,
    /// 各类别包数，顺序同 [`TrafficKind::ALL`]
    pub packets: [u64; 3],
}

impl BridgeDomainRecord {
    /// 把计数行拆成每个流量类别一条记录
    pub fn counters(&self) -> impl Iterator<Item = CounterRecord<(String, Endpoint), TrafficKind>> + '_ {
        TrafficKind::ALL
            .iter()
            .zip(self.packets.iter())
            .map(move |(kind, value)| CounterRecord {
                entity: (self.group.clone(), self.endpoint.clone()),
                kind: *kind,
                value: *value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_decimal_id() {
        assert_eq!(Node::new("0x1000", "0/0/CPU0").decimal_id(), Some(4096));
        assert_eq!(Node::new("0x0", "0/RP0/CPU0").decimal_id(), Some(0));
        assert_eq!(Node::new("0xzz", "bad").decimal_id(), None);
    }

    #[test]
    fn test_endpoint_rendering() {
        let ac = Endpoint::AccessCircuit("Gi0/0/0/1.100".to_string());
        assert_eq!(ac.to_string(), "Gi0/0/0/1.100");

        let pw = Endpoint::Pseudowire {
            neighbor: "10.0.0.2".to_string(),
            pw_id: "200".to_string(),
        };
        assert_eq!(pw.to_string(), "neighbor: 10.0.0.2, ID: 200");
    }

    #[test]
    fn test_bridge_domain_record_splits_by_kind() {
        let record = BridgeDomainRecord {
            group: "G1:BD1".to_string(),
            endpoint: Endpoint::AccessCircuit("E1".to_string()),
            packets: [1, 2, 3],
        };
        let counters: Vec<_> = record.counters().collect();
        assert_eq!(counters.len(), 3);
        assert_eq!(counters[0].kind, TrafficKind::Broadcast);
        assert_eq!(counters[0].value, 1);
        assert_eq!(counters[2].kind, TrafficKind::UnknownUnicast);
        assert_eq!(counters[2].value, 3);
    }
}
