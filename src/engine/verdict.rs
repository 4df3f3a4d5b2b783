// ==========================================
// 光纤线缆验证系统 - 判定合并器
// ==========================================
// 红线: 严格 AND,无部分通过路径
// - 两项均存在 → 均 APPROVED 才 APPROVED
// - 仅一项存在 → REJECTED
// - 均不存在 → NOT_FOUND
// ==========================================

use crate::domain::types::{OverallVerdict, SerialVerdict};

pub fn combine(ilrl: SerialVerdict, geometry: SerialVerdict) -> OverallVerdict {
    match (ilrl, geometry) {
        (SerialVerdict::NotFound, SerialVerdict::NotFound) => OverallVerdict::NotFound,
        (SerialVerdict::Approved, SerialVerdict::Approved) => OverallVerdict::Approved,
        _ => OverallVerdict::Rejected,
    }
}
