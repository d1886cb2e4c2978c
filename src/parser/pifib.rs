//! 线卡枚举与 LPTS 硬件丢包表

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{FlowDrops, Node};

static NODE_ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(0x\S+)\s(\S+)").unwrap());

/// 每个节点要查询的一张硬件计数表
#[derive(Debug)]
pub struct CounterTable {
    /// 传给 `-z` 的值
    pub zone: &'static str,
    row: LazyLock<Regex>,
}

impl CounterTable {
    /// 查询参数，最后一个是十进制节点 ID
    pub fn args(&self, decimal_id: u64) -> Vec<String> {
        vec![
            "-z".to_string(),
            self.zone.to_string(),
            "-i".to_string(),
            decimal_id.to_string(),
        ]
    }

    /// 所有匹配行，没有则为空
    pub fn parse_rows(&self, output: &str) -> Vec<FlowDrops> {
        self.row
            .captures_iter(output)
            .filter_map(|caps| {
                let drops = caps[2].parse::<u64>().ok()?;
                Some(FlowDrops {
                    flow: caps[1].to_string(),
                    drops,
                })
            })
            .collect()
    }
}

pub const PIFIB_COMMAND: &str = "platform_show_pifib";

/// 每个节点按顺序查询
pub static COUNTER_TABLES: [CounterTable; 2] = [
    CounterTable {
        zone: "0x6",
        row: LazyLock::new(|| Regex::new(r"(\S+)\s+\d+\s+\S+\s+\d+\s+\d+\s+\d+\s+(\d+)").unwrap()),
    },
    CounterTable {
        zone: "0x7",
        row: LazyLock::new(|| Regex::new(r"(\S+)\s+\S+\s+\d+\s+\d+\s+\d+\s+(\d+)").unwrap()),
    },
];

/// 从节点枚举输出中解析 `(十六进制 ID, 名称)`
pub fn parse_node_list(output: &str) -> Vec<Node> {
    NODE_ENTRY
        .captures_iter(output)
        .map(|caps| Node::new(&caps[1], &caps[2]))
        .collect()
}
