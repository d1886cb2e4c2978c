//! 基于脚本化设备输出的 LPTS 监控周期测试

mod common;

use common::{hardware_table, pifib, punt_table, ScriptedRunner, NODE_LIST};
use drop_monitor::{Alert, LptsMonitor, Monitor, Node, NodeQuerySource, Severity, ThresholdConfig};

fn thresholds(flows: &[&str], limits: &[i64]) -> ThresholdConfig {
    let flows: Vec<String> = flows.iter().map(|f| f.to_string()).collect();
    ThresholdConfig::from_lists(&flows, limits).unwrap()
}

/// 单块线卡 `0/0/CPU0`（0x800 = 2048），punt 表无丢包
fn single_card(runner: &ScriptedRunner) {
    runner.set(NODE_LIST, "0x800 0/0/CPU0\n");
    runner.set(&pifib("0x7", 2048), punt_table(&[("ARP", 0)]));
}

fn monitor(runner: &ScriptedRunner, config: ThresholdConfig) -> LptsMonitor<ScriptedRunner> {
    LptsMonitor::new(NodeQuerySource::new(runner.clone()), config, 60)
}

#[test]
fn test_alert_fires_on_third_cycle() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    let mut monitor = monitor(&runner, thresholds(&["X", "*"], &[20, 0]));

    let mut alerts: Vec<Alert> = Vec::new();
    for raw in [100, 100, 130] {
        runner.set(&pifib("0x6", 2048), hardware_table(&[("X", raw)]));
        monitor.run_cycle(&mut alerts);
    }

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Info);
    assert_eq!(alerts[0].monitor, "LPTS");
    assert_eq!(
        alerts[0].message,
        "LPTS drop threshold (20) exceeded for flow type X on 0/0/CPU0, 30 drops in last 60 seconds."
    );
}

#[test]
fn test_first_sighting_never_alerts() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 1_000_000)]));
    let mut monitor = monitor(&runner, thresholds(&["*"], &[1]));

    let mut alerts: Vec<Alert> = Vec::new();
    let report = monitor.run_cycle(&mut alerts);

    assert!(alerts.is_empty());
    assert_eq!(report.records, 1);
    assert_eq!(monitor.tracker().baseline(&("0x800".to_string(), "X".to_string())).map(|b| b.raw), Some(1_000_000));
}

#[test]
fn test_level_triggered_repeats_while_above() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    for raw in [100, 150, 200, 205] {
        runner.set(&pifib("0x6", 2048), hardware_table(&[("BGP-known", raw)]));
        monitor.run_cycle(&mut alerts);
    }

    // 增量依次为 0、50、50、5
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a.message.contains("50 drops")));
}

#[test]
fn test_flow_match_is_case_insensitive_with_wildcard_fallback() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    let mut monitor = monitor(&runner, thresholds(&["icmp-default", "*"], &[100, 5]));

    let mut alerts: Vec<Alert> = Vec::new();
    runner.set(
        &pifib("0x6", 2048),
        hardware_table(&[("ICMP-default", 10), ("SSH-known", 10)]),
    );
    monitor.run_cycle(&mut alerts);
    runner.set(
        &pifib("0x6", 2048),
        hardware_table(&[("ICMP-default", 60), ("SSH-known", 60)]),
    );
    monitor.run_cycle(&mut alerts);

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("threshold (5)"));
    assert!(alerts[0].message.contains("flow type SSH-known"));
}

#[test]
fn test_empty_node_list_is_warning() {
    let runner = ScriptedRunner::new();
    runner.set(NODE_LIST, "");
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    let report = monitor.run_cycle(&mut alerts);

    assert_eq!(alerts, vec![Alert::warning("LPTS", "Could not get list of line cards")]);
    assert_eq!(report.failures, 1);
    assert_eq!(runner.calls(), vec![NODE_LIST.to_string()]);
}

#[test]
fn test_missing_enumerator_is_error() {
    let runner = ScriptedRunner::new();
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    monitor.run_cycle(&mut alerts);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Error);
    assert!(alerts[0].message.starts_with("Could not get list of line cards"));
}

#[test]
fn test_table_without_rows_reports_and_continues() {
    let runner = ScriptedRunner::new();
    runner.set(NODE_LIST, "0x800 0/0/CPU0\n0x820 0/1/CPU0\n");
    runner.set(&pifib("0x6", 2048), "% Failed to get pifib data\n");
    runner.set(&pifib("0x7", 2048), punt_table(&[("ARP", 40)]));
    runner.set(&pifib("0x6", 2080), hardware_table(&[("X", 7)]));
    runner.set(&pifib("0x7", 2080), punt_table(&[("ARP", 3)]));
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    let report = monitor.run_cycle(&mut alerts);

    assert_eq!(alerts, vec![Alert::error("LPTS", "Could not get LPTS drops for 0/0/CPU0")]);
    assert_eq!(report.failures, 1);
    // 失败线卡的 punt 表和下一块线卡的两张表仍会读取
    assert_eq!(report.records, 3);
    assert_eq!(runner.calls().len(), 5);
}

#[test]
fn test_failed_fetch_keeps_baseline() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    let mut monitor = monitor(&runner, thresholds(&["*"], &[30]));
    let key = ("0x800".to_string(), "X".to_string());

    let mut alerts: Vec<Alert> = Vec::new();
    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 100)]));
    monitor.run_cycle(&mut alerts);

    runner.remove(&pifib("0x6", 2048));
    monitor.run_cycle(&mut alerts);
    assert_eq!(monitor.tracker().baseline(&key).map(|b| b.raw), Some(100));

    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 150)]));
    monitor.run_cycle(&mut alerts);

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].severity, Severity::Error);
    assert!(alerts[1].message.contains("50 drops"));
}

#[test]
fn test_zero_drop_rows_are_not_tracked() {
    let runner = ScriptedRunner::new();
    single_card(&runner);
    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 0), ("Y", 4)]));
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    let report = monitor.run_cycle(&mut alerts);

    assert_eq!(report.records, 1);
    assert_eq!(monitor.tracker().len(), 1);
}

#[test]
fn test_injected_node_lister_skips_enumerator() {
    let runner = ScriptedRunner::new();
    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 1)]));
    runner.set(&pifib("0x7", 2048), punt_table(&[("ARP", 1)]));
    let source = NodeQuerySource::new(runner.clone()).with_lister(vec![Node::new("0x800", "0/0/CPU0")]);
    let mut monitor = LptsMonitor::new(source, thresholds(&["*"], &[10]), 60);

    let mut alerts: Vec<Alert> = Vec::new();
    monitor.run_cycle(&mut alerts);

    assert!(alerts.is_empty());
    assert!(!runner.calls().iter().any(|c| c == NODE_LIST));
}

#[test]
fn test_unparseable_node_id_is_reported() {
    let runner = ScriptedRunner::new();
    runner.set(NODE_LIST, "0xzz 0/9/CPU0\n0x800 0/0/CPU0\n");
    runner.set(&pifib("0x6", 2048), hardware_table(&[("X", 1)]));
    runner.set(&pifib("0x7", 2048), punt_table(&[("ARP", 1)]));
    let mut monitor = monitor(&runner, thresholds(&["*"], &[10]));

    let mut alerts: Vec<Alert> = Vec::new();
    let report = monitor.run_cycle(&mut alerts);

    assert_eq!(alerts, vec![Alert::error("LPTS", "Could not get LPTS drops for 0/9/CPU0")]);
    assert_eq!(report.failures, 1);
    assert_eq!(report.records, 2);
}
