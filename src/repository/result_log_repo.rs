// ==========================================
// 光纤线缆验证系统 - 验证结果日志仓储
// ==========================================
// 对齐: verification_log 表 (db::RESULT_LOG_SCHEMA_SQL)
// 红线: 只追加,不更新,不删除
// ==========================================

use crate::db::ensure_result_log_schema;
use crate::domain::result_log::VerificationLogEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 时间列存储格式
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str = r#"
    SELECT log_id, work_order, serial, ilrl_verdict, geometry_verdict,
           overall_verdict, ilrl_latest, geometry_latest,
           ilrl_files, geometry_files, verified_at
    FROM verification_log
"#;

// ==========================================
// ResultLogRepository - 验证结果日志仓储
// ==========================================
pub struct ResultLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ResultLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（幂等）
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        ensure_result_log_schema(&conn)?;
        Ok(())
    }

    /// 追加一条验证结果
    ///
    /// # 返回
    /// - `Ok(log_id)`: 成功写入
    /// - `Err(UniqueConstraintViolation)`: log_id 重复
    pub fn append(&self, entry: &VerificationLogEntry) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO verification_log (
                log_id, work_order, serial, ilrl_verdict, geometry_verdict,
                overall_verdict, ilrl_latest, geometry_latest,
                ilrl_files, geometry_files, verified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                entry.log_id,
                entry.work_order,
                entry.serial,
                entry.ilrl_verdict,
                entry.geometry_verdict,
                entry.overall_verdict,
                entry.ilrl_latest.map(|t| t.format(TS_FORMAT).to_string()),
                entry.geometry_latest.map(|t| t.format(TS_FORMAT).to_string()),
                serde_json::to_string(&entry.ilrl_files)?,
                serde_json::to_string(&entry.geometry_files)?,
                entry.verified_at.format(TS_FORMAT).to_string(),
            ],
        )?;

        Ok(entry.log_id.clone())
    }

    /// 查询某序列号的全部验证记录（新 → 旧）
    pub fn find_by_serial(&self, serial: &str) -> RepositoryResult<Vec<VerificationLogEntry>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "{} WHERE serial = ? ORDER BY verified_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![serial], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }

    /// 最近的验证记录（新 → 旧）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<VerificationLogEntry>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "{} ORDER BY verified_at DESC, rowid DESC LIMIT ?",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![limit as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }
}

fn parse_ts(idx: usize, text: &str) -> SqliteResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_files(idx: usize, text: &str) -> SqliteResult<Vec<String>> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn map_row(row: &Row) -> SqliteResult<VerificationLogEntry> {
    let ilrl_latest: Option<String> = row.get(6)?;
    let geometry_latest: Option<String> = row.get(7)?;
    let ilrl_files: String = row.get(8)?;
    let geometry_files: String = row.get(9)?;
    let verified_at: String = row.get(10)?;

    Ok(VerificationLogEntry {
        log_id: row.get(0)?,
        work_order: row.get(1)?,
        serial: row.get(2)?,
        ilrl_verdict: row.get(3)?,
        geometry_verdict: row.get(4)?,
        overall_verdict: row.get(5)?,
        ilrl_latest: ilrl_latest.map(|s| parse_ts(6, &s)).transpose()?,
        geometry_latest: geometry_latest.map(|s| parse_ts(7, &s)).transpose()?,
        ilrl_files: parse_files(8, &ilrl_files)?,
        geometry_files: parse_files(9, &geometry_files)?,
        verified_at: parse_ts(10, &verified_at)?,
    })
}
