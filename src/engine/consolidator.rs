// ==========================================
// 光纤线缆验证系统 - 测量点合并器
// ==========================================
// 职责: 同一物理测量点的重复测量按"最新者胜出"归并,并判定完整性
// 适用: ILRL（连接器 + 行号）与 几何（物理端点）两个命名域
// ==========================================
// 规则:
// - 时间较晚者替换已持有者
// - 时间相等或不可比较时保留已持有者（先到先得）
// - 例外: 已持有者无时间而新来者有时间 → 替换
// ==========================================

use crate::domain::measurement::{GeometryPoint, MeasurementPoint};
use crate::domain::types::{ConnectorTag, PhysicalTip, SerialVerdict};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

// ==========================================
// Measured Trait - 可合并的测量点
// ==========================================
pub trait Measured {
    /// 物理测量点键
    type Key: Ord + Clone;

    fn physical_key(&self) -> Self::Key;
    fn measured_at(&self) -> Option<NaiveDateTime>;
    fn is_pass(&self) -> bool;
}

impl Measured for GeometryPoint {
    type Key = PhysicalTip;

    fn physical_key(&self) -> PhysicalTip {
        self.tip.physical()
    }

    fn measured_at(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    fn is_pass(&self) -> bool {
        self.passed
    }
}

impl Measured for MeasurementPoint {
    /// 同一连接器类型的同一行视为同一物理线路（返工文件覆盖原文件）
    type Key = (ConnectorTag, usize);

    fn physical_key(&self) -> (ConnectorTag, usize) {
        (self.connector, self.line_number)
    }

    fn measured_at(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    fn is_pass(&self) -> bool {
        self.result.is_pass()
    }
}

/// 判断新来的测量是否应替换已持有的测量
fn supersedes(incoming: Option<NaiveDateTime>, held: Option<NaiveDateTime>) -> bool {
    match (incoming, held) {
        (Some(new_ts), Some(held_ts)) => new_ts > held_ts,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

// ==========================================
// Consolidated - 合并结果
// ==========================================
pub struct Consolidated<P: Measured> {
    retained: BTreeMap<P::Key, P>,
}

impl<P: Measured + Clone> Consolidated<P> {
    /// 按输入顺序归并测量点
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a P>,
        P: 'a,
    {
        let mut retained: BTreeMap<P::Key, P> = BTreeMap::new();
        for point in points {
            let key = point.physical_key();
            let replace = retained
                .get(&key)
                .map_or(true, |held| supersedes(point.measured_at(), held.measured_at()));
            if replace {
                retained.insert(key, point.clone());
            }
        }
        Self { retained }
    }
}

impl<P: Measured> Consolidated<P> {
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn get(&self, key: &P::Key) -> Option<&P> {
        self.retained.get(key)
    }

    /// 保留下来的测量点（按物理键排序）
    pub fn points(&self) -> impl Iterator<Item = &P> {
        self.retained.values()
    }

    pub fn into_points(self) -> Vec<P> {
        self.retained.into_values().collect()
    }

    /// 保留点中的最新时间
    pub fn latest_timestamp(&self) -> Option<NaiveDateTime> {
        self.retained.values().filter_map(|p| p.measured_at()).max()
    }

    /// 判定
    ///
    /// # 规则
    /// - 无任何测量点 → NotFound
    /// - required 给定: 全部物理点到齐且均 PASS → Approved
    /// - required 为 None: 已有物理点均 PASS → Approved
    /// - 其他 → Rejected
    pub fn verdict(&self, required: Option<&[P::Key]>) -> SerialVerdict {
        if self.retained.is_empty() {
            return SerialVerdict::NotFound;
        }

        let complete = required
            .map(|keys| keys.iter().all(|k| self.retained.contains_key(k)))
            .unwrap_or(true);
        let all_pass = self.retained.values().all(|p| p.is_pass());

        if complete && all_pass {
            SerialVerdict::Approved
        } else {
            SerialVerdict::Rejected
        }
    }
}

/// 几何判定: 物理端点 1..4 必须全部到齐且通过
pub fn geometry_verdict(points: &[GeometryPoint]) -> SerialVerdict {
    Consolidated::from_points(points).verdict(Some(&PhysicalTip::REQUIRED[..]))
}
