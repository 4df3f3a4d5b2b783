// ==========================================
// 光纤线缆验证系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod result_log_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use result_log_repo::ResultLogRepository;
