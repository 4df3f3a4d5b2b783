// ==========================================
// 光纤线缆验证系统 - 核心库
// ==========================================
// 职责: 读取 ILRL / 几何测试导出表格,按序列号给出确定性判定
// 技术栈: Rust + calamine + SQLite
// 系统定位: 质检判定核心（界面由外部应用负责）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格/表格、判定类型、测量记录
pub mod domain;

// 引擎层 - 识别、提取、合并、判定
pub mod engine;

// 导入层 - 文件定位与表格读取
pub mod importer;

// 配置层 - 目录与布局配置
pub mod config;

// 数据仓储层 - 验证结果日志
pub mod repository;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, ConnectorTag, FileVerdict, GeometryPoint, IlrlFileType, MeasurementPoint,
    OverallVerdict, RawGrid, SerialVerdict, TestResult, TipLabel, VerificationLogEntry,
    VerificationReport,
};

// 引擎
pub use engine::{CableVerifier, GeometryExtractor, IlrlExtractor, VerificationRequest};

// 导入
pub use importer::{FileLocator, GridSource, ImportError, ImportResult, WorkbookReader};

// 配置
pub use config::{EngineConfig, VerifierConfig};

// 仓储
pub use repository::{RepositoryError, RepositoryResult, ResultLogRepository};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "光纤线缆验证系统";
