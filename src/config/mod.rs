// ==========================================
// 光纤线缆验证系统 - 配置层
// ==========================================
// 职责: 基础目录、结果日志路径、表格布局参数
// 存储: JSON 配置文件（config.json）
// ==========================================

pub mod verifier_config;

// 重导出核心配置
pub use verifier_config::{default_config_path, EngineConfig, GeometryColumns, VerifierConfig};
