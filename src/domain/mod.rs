// ==========================================
// 光纤线缆验证系统 - 领域模型层
// ==========================================
// 职责: 定义单元格/表格、判定类型、测量记录、结果日志实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod cell;
pub mod measurement;
pub mod result_log;
pub mod types;

// 重导出核心类型
pub use cell::{CellValue, RawGrid};
pub use measurement::{
    format_geometry_timestamp, format_ilrl_timestamp, GeometryOutcome, GeometryPoint,
    IlrlOutcome, MeasurementPoint, VerificationReport, UNKNOWN_RESULT, UNKNOWN_TIMESTAMP,
};
pub use result_log::VerificationLogEntry;
pub use types::{
    ConnectorTag, FileVerdict, IlrlFileType, OverallVerdict, PhysicalTip, SerialVerdict,
    TestResult, TipLabel, TipOrientation,
};
