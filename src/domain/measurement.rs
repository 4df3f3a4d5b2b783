// ==========================================
// 光纤线缆验证系统 - 测量记录与验证报告
// ==========================================
// 职责: ILRL 测量行 / 几何测量点 / 单次验证请求的完整输出
// 生命周期: 每次验证新建,引擎内不持久化
// ==========================================

use crate::domain::types::{
    ConnectorTag, IlrlFileType, OverallVerdict, SerialVerdict, TestResult, TipLabel,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 无法解析时间戳时的显示值
pub const UNKNOWN_TIMESTAMP: &str = "N/A";

/// 几何结果单元格为空时的显示值
pub const UNKNOWN_RESULT: &str = "N/A";

/// ILRL 时间显示格式
pub const ILRL_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// 几何时间显示格式
pub const GEOMETRY_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub fn format_ilrl_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(ILRL_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string())
}

pub fn format_geometry_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(GEOMETRY_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string())
}

// ==========================================
// MeasurementPoint - ILRL 测量行
// ==========================================
// 仅以文件内的行位置标识（line_number 从 1 开始,按有效行计数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub line_number: usize,
    pub result: TestResult,
    pub timestamp: Option<NaiveDateTime>, // None = 时间未知
    pub file_name: String,
    pub file_type: IlrlFileType,
    pub connector: ConnectorTag,
}

impl MeasurementPoint {
    pub fn display_timestamp(&self) -> String {
        format_ilrl_timestamp(self.timestamp)
    }
}

// ==========================================
// GeometryPoint - 几何测量点
// ==========================================
// 以 (13 位序列号, 端点标签) 标识
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub serial: String,
    pub tip: TipLabel,
    pub result_text: Option<String>, // 原始结果文本（TRIM + UPPER）
    pub passed: bool,
    pub timestamp: Option<NaiveDateTime>,
    pub source_row: usize,
}

impl GeometryPoint {
    pub fn display_result(&self) -> &str {
        self.result_text.as_deref().unwrap_or(UNKNOWN_RESULT)
    }

    pub fn display_timestamp(&self) -> String {
        format_geometry_timestamp(self.timestamp)
    }
}

// ==========================================
// 验证报告
// ==========================================

/// ILRL 测试族结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlrlOutcome {
    pub verdict: SerialVerdict,
    pub latest_timestamp: Option<NaiveDateTime>,
    pub latest_display: String,
    pub analyzed_files: Vec<String>,
    pub points: Vec<MeasurementPoint>,
    pub retained: Vec<MeasurementPoint>,
}

impl IlrlOutcome {
    pub fn not_found() -> Self {
        Self {
            verdict: SerialVerdict::NotFound,
            latest_timestamp: None,
            latest_display: UNKNOWN_TIMESTAMP.to_string(),
            analyzed_files: Vec::new(),
            points: Vec::new(),
            retained: Vec::new(),
        }
    }
}

/// 几何测试族结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryOutcome {
    pub verdict: SerialVerdict,
    /// 本序列号保留点（每物理端点最新一次）中的最新时间,
    /// 不是几何文件内全部序列号的最新时间
    pub latest_timestamp: Option<NaiveDateTime>,
    /// `latest_timestamp` 的显示文本,无时间时为 `N/A`
    pub latest_display: String,
    pub analyzed_files: Vec<String>,
    pub points: Vec<GeometryPoint>,
    pub retained: Vec<GeometryPoint>,
}

impl GeometryOutcome {
    pub fn not_found() -> Self {
        Self {
            verdict: SerialVerdict::NotFound,
            latest_timestamp: None,
            latest_display: UNKNOWN_TIMESTAMP.to_string(),
            analyzed_files: Vec::new(),
            points: Vec::new(),
            retained: Vec::new(),
        }
    }
}

/// 单次验证请求的完整输出（判定 + 明细）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub work_order: String,
    pub serial: String,
    pub serial_suffix: String,
    pub ilrl: IlrlOutcome,
    pub geometry: GeometryOutcome,
    pub overall: OverallVerdict,
}
