//! 增量跟踪 - 每个序列的上次原始值与周期增量

use std::collections::HashMap;
use std::hash::Hash;

/// 序列的上一次读数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub raw: u64,
    pub last_delta: i64,
}

/// 向跟踪器输入一次读数的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// `new - previous`，建基线时为 0
    pub delta: i64,
    /// 上一周期的增量，建基线时为 0
    pub previous_delta: i64,
    /// 首次见到该键时为 false
    pub had_baseline: bool,
}

/// 保存所有已见 `(实体, 计数类别)` 序列的基线。
///
/// 不检测计数器复位和回绕：设备侧复位会产生负增量，原样传递。
/// 读取失败的序列保留旧基线，下一次增量会覆盖所有错过的周期。
#[derive(Debug, Clone)]
pub struct DeltaTracker<K> {
    baselines: HashMap<K, Baseline>,
}

impl<K: Hash + Eq> DeltaTracker<K> {
    pub fn new() -> Self {
        Self {
            baselines: HashMap::new(),
        }
    }

    /// 记录 `key` 的 `value`，返回相对上一周期的增量。
    /// 基线总是被覆盖。
    pub fn observe(&mut self, key: K, value: u64) -> Observation {
        match self.baselines.get_mut(&key) {
            Some(baseline) => {
                let delta = counter_delta(baseline.raw, value);
                let previous_delta = baseline.last_delta;
                *baseline = Baseline {
                    raw: value,
                    last_delta: delta,
                };
                Observation {
                    delta,
                    previous_delta,
                    had_baseline: true,
                }
            }
            None => {
                self.baselines.insert(
                    key,
                    Baseline {
                        raw: value,
                        last_delta: 0,
                    },
                );
                Observation {
                    delta: 0,
                    previous_delta: 0,
                    had_baseline: false,
                }
            }
        }
    }

    pub fn baseline(&self, key: &K) -> Option<&Baseline> {
        self.baselines.get(key)
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}

impl<K: Hash + Eq> Default for DeltaTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn counter_delta(previous: u64, current: u64) -> i64 {
    (i128::from(current) - i128::from(previous)).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
