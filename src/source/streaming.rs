//! 流式数据源：逐行消费桥域详情输出

use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::infra::command::{command_line, CommandRunner};
use crate::model::BridgeDomainRecord;
use crate::parser::bridge_domain::{BridgeDomainParser, L2VPN_ARGS, L2VPN_COMMAND};

pub struct BridgeDomainSource<R> {
    runner: R,
}

impl<R: CommandRunner> BridgeDomainSource<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// 流式读取详情输出，每解析出一条计数行立即交给 `on_record`，返回记录数。
    ///
    /// 输出中没有任何桥组头时返回 `SourceUnavailable`。
    /// 中途失败前已交付的记录仍然有效。
    pub fn collect(&self, on_record: &mut dyn FnMut(BridgeDomainRecord)) -> Result<usize> {
        let args: Vec<String> = L2VPN_ARGS.iter().map(|a| a.to_string()).collect();
        let mut parser = BridgeDomainParser::new();
        let mut count = 0;

        self.runner.stream(L2VPN_COMMAND, &args, &mut |line| {
            if let Some(record) = parser.feed(line) {
                count += 1;
                on_record(record);
            }
        })?;

        if !parser.saw_group() {
            return Err(MonitorError::source_unavailable(
                command_line(L2VPN_COMMAND, &args),
                "no bridge group in output",
            ));
        }

        debug!(groups = parser.groups_seen(), records = count, "Bridge-domain detail parsed");
        Ok(count)
    }
}
