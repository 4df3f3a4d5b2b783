// ==========================================
// 光纤线缆验证系统 - 验证结果日志领域模型
// ==========================================
// 红线: 只追加,不修改
// 对齐: verification_log 表
// ==========================================

use crate::domain::measurement::VerificationReport;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// VerificationLogEntry - 验证结果日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    pub log_id: String,
    pub work_order: String,
    pub serial: String,
    pub ilrl_verdict: String,
    pub geometry_verdict: String,
    pub overall_verdict: String,
    pub ilrl_latest: Option<NaiveDateTime>,
    pub geometry_latest: Option<NaiveDateTime>,
    pub ilrl_files: Vec<String>,
    pub geometry_files: Vec<String>,
    pub verified_at: NaiveDateTime,
}

impl VerificationLogEntry {
    /// 由验证报告生成日志条目（新 UUID,当前本地时间）
    pub fn from_report(report: &VerificationReport) -> Self {
        Self::from_report_at(report, Local::now().naive_local())
    }

    pub fn from_report_at(report: &VerificationReport, verified_at: NaiveDateTime) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            work_order: report.work_order.clone(),
            serial: report.serial.clone(),
            ilrl_verdict: report.ilrl.verdict.as_str().to_string(),
            geometry_verdict: report.geometry.verdict.as_str().to_string(),
            overall_verdict: report.overall.as_str().to_string(),
            ilrl_latest: report.ilrl.latest_timestamp,
            geometry_latest: report.geometry.latest_timestamp,
            ilrl_files: report.ilrl.analyzed_files.clone(),
            geometry_files: report.geometry.analyzed_files.clone(),
            verified_at,
        }
    }
}
