// ==========================================
// 光纤线缆验证系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout
// - 结果日志表建表（幂等）
// ==========================================

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 验证结果日志表
pub const RESULT_LOG_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS verification_log (
    log_id TEXT PRIMARY KEY,
    work_order TEXT NOT NULL,
    serial TEXT NOT NULL,
    ilrl_verdict TEXT NOT NULL,
    geometry_verdict TEXT NOT NULL,
    overall_verdict TEXT NOT NULL,
    ilrl_latest TEXT,
    geometry_latest TEXT,
    ilrl_files TEXT NOT NULL,
    geometry_files TEXT NOT NULL,
    verified_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_verification_log_serial
    ON verification_log (serial, verified_at);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建结果日志表（已存在则跳过）
pub fn ensure_result_log_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(RESULT_LOG_SCHEMA_SQL)
}
