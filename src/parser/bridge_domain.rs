//! 桥域详情输出 - 行语法与流式归属
//!
//! 输出逐行消费。每行由一张小的匹配规则表分类；
//! [`BridgeDomainParser`] 记录当前桥组和端点，并把计数行归属给它们。

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::model::{BridgeDomainRecord, Endpoint};

pub const L2VPN_COMMAND: &str = "l2vpn_show";
pub const L2VPN_ARGS: [&str; 2] = ["-d", "0x9"];

/// 桥域详情输出的行分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `<桥组>:<桥域>`
    GroupHeader(String),
    Endpoint(Endpoint),
    /// 广播、组播、未知单播丢包数
    Counters([u64; 3]),
    Other,
}

type Matcher = fn(&Captures<'_>) -> Option<LineKind>;

fn group_header(caps: &Captures<'_>) -> Option<LineKind> {
    Some(LineKind::GroupHeader(format!("{}:{}", &caps[1], &caps[2])))
}

fn access_circuit(caps: &Captures<'_>) -> Option<LineKind> {
    Some(LineKind::Endpoint(Endpoint::AccessCircuit(caps[1].to_string())))
}

fn pseudowire(caps: &Captures<'_>) -> Option<LineKind> {
    Some(LineKind::Endpoint(Endpoint::Pseudowire {
        neighbor: caps[1].to_string(),
        pw_id: caps[2].to_string(),
    }))
}

fn counters(caps: &Captures<'_>) -> Option<LineKind> {
    Some(LineKind::Counters([
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ]))
}

static GRAMMAR: LazyLock<Vec<(Regex, Matcher)>> = LazyLock::new(|| {
    let rules: [(&str, Matcher); 4] = [
        (r"^Bridge group: (.*?), bridge-domain: (.*?),", group_header),
        (r"^\s+AC: (.*?), state is up", access_circuit),
        (r"^\s+PW: neighbor (.*?), PW ID (.*?),", pseudowire),
        (
            r"^\s+packets: broadcast (\d+), multicast (\d+), unknown unicast (\d+)",
            counters,
        ),
    ];
    rules
        .into_iter()
        .map(|(pattern, matcher)| (Regex::new(pattern).unwrap(), matcher))
        .collect()
});

/// 分类一行，第一条匹配的规则生效
pub fn classify(line: &str) -> LineKind {
    GRAMMAR
        .iter()
        .find_map(|(regex, matcher)| regex.captures(line).and_then(|caps| matcher(&caps)))
        .unwrap_or(LineKind::Other)
}

/// 单次遍历输出的解析上下文
#[derive(Debug, Default)]
pub struct BridgeDomainParser {
    group: Option<String>,
    endpoint: Option<Endpoint>,
    groups_seen: usize,
}

impl BridgeDomainParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 输入下一行；计数行归属成功时返回记录
    pub fn feed(&mut self, line: &str) -> Option<BridgeDomainRecord> {
        match classify(line) {
            LineKind::GroupHeader(group) => {
                self.group = Some(group);
                self.endpoint = None;
                self.groups_seen += 1;
                None
            }
            LineKind::Endpoint(endpoint) => {
                if self.group.is_some() {
                    self.endpoint = Some(endpoint);
                }
                None
            }
            LineKind::Counters(packets) => {
                let group = self.group.as_ref()?;
                let endpoint = self.endpoint.take()?;
                Some(BridgeDomainRecord {
                    group: group.clone(),
                    endpoint,
                    packets,
                })
            }
            LineKind::Other => None,
        }
    }

    /// 是否见过桥组头
    pub fn saw_group(&self) -> bool {
        self.groups_seen > 0
    }

    pub fn groups_seen(&self) -> usize {
        self.groups_seen
    }
}
