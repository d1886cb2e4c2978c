//! 阈值配置与越限判定

use crate::error::{MonitorError, Result};
use crate::model::TrafficKind;
use crate::tracker::Observation;

pub const WILDCARD: &str = "*";

/// 有序的匹配键 → 阈值表，必须包含 `*` 兜底项。
/// 阈值 ≤ 0 表示该键不告警。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdConfig {
    entries: Vec<(String, i64)>,
}

impl ThresholdConfig {
    /// 按位置把 `keys` 与 `limits` 配对
    pub fn from_lists(keys: &[String], limits: &[i64]) -> Result<Self> {
        if keys.len() != limits.len() {
            return Err(MonitorError::config(format!(
                "{} match keys but {} thresholds; every match key needs a threshold",
                keys.len(),
                limits.len()
            )));
        }
        if !keys.iter().any(|k| k == WILDCARD) {
            return Err(MonitorError::config("the wildcard match key '*' is required"));
        }

        Ok(Self {
            entries: keys.iter().cloned().zip(limits.iter().copied()).collect(),
        })
    }

    /// 广播风暴监控的分类阈值。
    ///
    /// 恰好三个值时依次对应 broadcast、multicast、unknown unicast，
    /// 此时每类各自独立，某类 ≤ 0 即关闭该类告警，不回退到其它类的阈值。
    /// 其它长度则把第一个值用于全部三类。
    pub fn for_traffic_kinds(limits: &[i64]) -> Result<Self> {
        let first = *limits
            .first()
            .ok_or_else(|| MonitorError::config("at least one threshold is required"))?;
        let (per_kind, fallback) = if limits.len() == 3 {
            ([limits[0], limits[1], limits[2]], 0)
        } else {
            ([first; 3], first)
        };

        let mut entries: Vec<(String, i64)> = TrafficKind::ALL
            .iter()
            .zip(per_kind)
            .map(|(kind, limit)| (kind.key().to_string(), limit))
            .collect();
        entries.push((WILDCARD.to_string(), fallback));
        Ok(Self { entries })
    }

    /// `match_key` 的阈值：第一个大小写不敏感匹配且为正的项，否则取 `*`
    pub fn limit_for(&self, match_key: &str) -> i64 {
        self.lookup(match_key)
            .filter(|limit| *limit > 0)
            .unwrap_or_else(|| self.lookup(WILDCARD).unwrap_or(0))
    }

    fn lookup(&self, key: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, limit)| *limit)
    }
}

/// 告警触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// 只要增量高于阈值，每个周期都告警
    Level,
    /// 高于阈值时每周期告警，回落时再发一次恢复通知
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    Exceeded { limit: i64, delta: i64 },
    /// 上一周期的越限已结束，不带测量值
    Cleared { limit: i64 },
}

pub struct ThresholdEvaluator {
    thresholds: ThresholdConfig,
    policy: TriggerPolicy,
}

impl ThresholdEvaluator {
    pub fn new(thresholds: ThresholdConfig, policy: TriggerPolicy) -> Self {
        Self { thresholds, policy }
    }

    pub fn evaluate(&self, match_key: &str, obs: &Observation) -> Option<AlertDecision> {
        if !obs.had_baseline {
            return None;
        }

        let limit = self.thresholds.limit_for(match_key);
        if limit <= 0 {
            return None;
        }

        if obs.delta > limit {
            return Some(AlertDecision::Exceeded {
                limit,
                delta: obs.delta,
            });
        }

        match self.policy {
            TriggerPolicy::Edge if obs.previous_delta > limit => {
                Some(AlertDecision::Cleared { limit })
            }
            _ => None,
        }
    }
}
