//! 测试公共组件：脚本化命令执行器

#![allow(dead_code)]

use drop_monitor::infra::command_line;
use drop_monitor::{CommandOutput, CommandRunner, MonitorError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct Script {
    outputs: HashMap<String, CommandOutput>,
    calls: Vec<String>,
}

/// 按完整命令行回放预置输出。克隆共享同一脚本，
/// 测试可以在周期之间修改输出。
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    script: Rc<RefCell<Script>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, command: &str, stdout: impl Into<String>) {
        self.set_output(command, CommandOutput::ok(stdout));
    }

    pub fn set_output(&self, command: &str, output: CommandOutput) {
        self.script.borrow_mut().outputs.insert(command.to_string(), output);
    }

    pub fn remove(&self, command: &str) {
        self.script.borrow_mut().outputs.remove(command);
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    fn lookup(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        let mut script = self.script.borrow_mut();
        script.calls.push(line.clone());
        script
            .outputs
            .get(&line)
            .cloned()
            .ok_or_else(|| MonitorError::source_unavailable(line, "command not found"))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.lookup(program, args)
    }

    fn stream(&self, program: &str, args: &[String], on_line: &mut dyn FnMut(&str)) -> Result<()> {
        let output = self.lookup(program, args)?;
        for line in output.stdout.lines() {
            on_line(line);
        }
        if output.success() {
            Ok(())
        } else {
            Err(MonitorError::source_unavailable(
                command_line(program, args),
                "non-zero exit",
            ))
        }
    }
}

pub const NODE_LIST: &str = "node_list_generation -c -f LC";

/// 节点查表命令行，`zone` 为 `0x6` 或 `0x7`
pub fn pifib(zone: &str, decimal_id: u64) -> String {
    format!("platform_show_pifib -z {} -i {}", zone, decimal_id)
}

/// `-z 0x6` 输出，每个 `(flow, drops)` 一行
pub fn hardware_table(rows: &[(&str, u64)]) -> String {
    let mut out = String::from("FlowType           Policer Type  Cur. Rate Burst Accepted Dropped\n");
    for (flow, drops) in rows {
        out.push_str(&format!("{:<18} 12      np    2500      1250  10042    {}\n", flow, drops));
    }
    out
}

/// `-z 0x7` 输出，每个 `(reason, drops)` 一行
pub fn punt_table(rows: &[(&str, u64)]) -> String {
    let mut out = String::from("Punt Reason        Type  Rate  Burst Accepted Dropped\n");
    for (reason, drops) in rows {
        out.push_str(&format!("{:<18} np    1000  200   5000     {}\n", reason, drops));
    }
    out
}

pub const L2VPN: &str = "l2vpn_show -d 0x9";

/// 桥域详情，每个 `(group, bd, ac, packets)` 一个接入电路
pub fn bridge_detail(entries: &[(&str, &str, &str, [u64; 3])]) -> String {
    let mut out = String::new();
    for (group, bd, ac, [b, m, u]) in entries {
        out.push_str(&format!(
            "Bridge group: {}, bridge-domain: {}, id: 0, state: up, ShgId: 0, MSTi: 0\n",
            group, bd
        ));
        out.push_str("  List of ACs:\n");
        out.push_str(&format!("    AC: {}, state is up\n", ac));
        out.push_str("      Storm Control drop counters:\n");
        out.push_str(&format!(
            "        packets: broadcast {}, multicast {}, unknown unicast {}\n",
            b, m, u
        ));
        out.push_str("        bytes: broadcast 0, multicast 0, unknown unicast 0\n");
    }
    out
}
