use crate::domain::action_log::AuditRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 统一的时间戳存储格式
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ==========================================
// AuditLogRepository - 审计日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct AuditLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AuditLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入一条审计记录
    ///
    /// # 返回
    /// - `Ok(log_id)`: 成功插入
    /// - `Err(...)`: 数据库错误（含 log_id 重复）
    pub fn insert(&self, record: &AuditRecord) -> RepositoryResult<String> {
        let details_json = serde_json::to_string(&record.details)?;
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO audit_log (
                log_id, timestamp, user_id, action_type, item_id, details
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.log_id,
                format_timestamp(&record.timestamp),
                record.user_id,
                record.action_type.as_str(),
                record.item_id,
                details_json,
            ],
        )?;

        Ok(record.log_id.clone())
    }

    /// 批量插入（单事务，任一失败整体回滚）
    pub fn batch_insert(&self, records: &[AuditRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO audit_log (
                    log_id, timestamp, user_id, action_type, item_id, details
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for record in records {
                stmt.execute(params![
                    record.log_id,
                    format_timestamp(&record.timestamp),
                    record.user_id,
                    record.action_type.as_str(),
                    record.item_id,
                    serde_json::to_string(&record.details)?,
                ])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }
}
