// ==========================================
// 光纤线缆验证系统 - 导入层
// ==========================================
// 职责: 外部协作边界: 候选文件定位、表格读取、查询校验
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_locator;
pub mod grid_reader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_locator::{is_candidate_workbook, FileLocator};
pub use grid_reader::{GridSource, WorkbookReader};
