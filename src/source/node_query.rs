//! 先枚举后查询的数据源：列出线卡，再逐个读取 LPTS 丢包表

use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::infra::command::{command_line, CommandOutput, CommandRunner};
use crate::model::{CounterRecord, FlowDrops, Node};
use crate::parser::pifib::{parse_node_list, CounterTable, COUNTER_TABLES, PIFIB_COMMAND};

pub const NODE_LIST_COMMAND: &str = "node_list_generation";
pub const NODE_LIST_ARGS: [&str; 3] = ["-c", "-f", "LC"];

/// 提供需要轮询的节点集合
pub trait NodeLister {
    fn list_nodes(&self) -> Result<Vec<Node>>;
}

/// 本周期某个节点未能读取的部分
#[derive(Debug)]
pub struct NodeFailure {
    pub node: Node,
    /// 失败的表；节点本身无法查询（如 ID 无法解析）时为 `None`
    pub zone: Option<&'static str>,
    pub error: MonitorError,
}

/// 一个周期读到的全部数据
#[derive(Debug, Default)]
pub struct NodeCollection {
    /// `(节点, 流类型, 丢包数)`
    pub records: Vec<CounterRecord<Node, String>>,
    pub failures: Vec<NodeFailure>,
}

pub struct NodeQuerySource<R> {
    runner: R,
    lister: Option<Box<dyn NodeLister>>,
}

impl<R: CommandRunner> NodeQuerySource<R> {
    pub fn new(runner: R) -> Self {
        Self { runner, lister: None }
    }

    /// 用 `lister` 代替节点枚举命令
    pub fn with_lister(mut self, lister: impl NodeLister + 'static) -> Self {
        self.lister = Some(Box::new(lister));
        self
    }

    /// 当前节点集合，为空时返回 `EmptyEntityList`
    pub fn list_nodes(&self) -> Result<Vec<Node>> {
        let nodes = match &self.lister {
            Some(lister) => lister.list_nodes()?,
            None => {
                let args = to_args(&NODE_LIST_ARGS);
                let output = checked(self.runner.run(NODE_LIST_COMMAND, &args)?, NODE_LIST_COMMAND, &args)?;
                parse_node_list(&output.stdout)
            }
        };

        if nodes.is_empty() {
            return Err(MonitorError::EmptyEntityList("no line cards reported".to_string()));
        }
        debug!(count = nodes.len(), "Nodes enumerated");
        Ok(nodes)
    }

    /// 枚举节点并读取每个节点的全部计数表。
    ///
    /// 只有枚举失败会中止本周期；单个节点或单张表失败记入 `failures`，
    /// 其余表和节点照常读取。
    pub fn collect(&self) -> Result<NodeCollection> {
        let nodes = self.list_nodes()?;
        let mut collection = NodeCollection::default();

        for node in nodes {
            let Some(decimal_id) = node.decimal_id() else {
                let error = MonitorError::source_unavailable(
                    PIFIB_COMMAND,
                    format!("unparseable node ID {}", node.id_hex),
                );
                collection.failures.push(NodeFailure { node, zone: None, error });
                continue;
            };

            for table in COUNTER_TABLES.iter() {
                match self.read_table(table, decimal_id) {
                    Ok(rows) => {
                        collection.records.extend(rows.into_iter().map(|row| CounterRecord {
                            entity: node.clone(),
                            kind: row.flow,
                            value: row.drops,
                        }));
                    }
                    Err(error) => collection.failures.push(NodeFailure {
                        node: node.clone(),
                        zone: Some(table.zone),
                        error,
                    }),
                }
            }
        }

        Ok(collection)
    }

    fn read_table(&self, table: &CounterTable, decimal_id: u64) -> Result<Vec<FlowDrops>> {
        let args = table.args(decimal_id);
        let output = checked(self.runner.run(PIFIB_COMMAND, &args)?, PIFIB_COMMAND, &args)?;
        let rows = table.parse_rows(&output.stdout);
        if rows.is_empty() {
            return Err(MonitorError::source_unavailable(
                command_line(PIFIB_COMMAND, &args),
                "no drop counter rows in output",
            ));
        }
        Ok(rows)
    }
}

/// 固定节点列表
impl NodeLister for Vec<Node> {
    fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.clone())
    }
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

fn checked(output: CommandOutput, program: &str, args: &[String]) -> Result<CommandOutput> {
    if output.success() {
        Ok(output)
    } else {
        let reason = match output.stderr.trim() {
            "" => format!("exit status {:?}", output.status),
            stderr => stderr.to_string(),
        };
        Err(MonitorError::source_unavailable(command_line(program, args), reason))
    }
}
