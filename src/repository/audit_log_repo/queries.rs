use super::core::{format_timestamp, AuditLogRepository};
use crate::domain::action_log::{AuditActionType, AuditDetails, AuditRecord};
use crate::repository::error::RepositoryResult;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Result as SqliteResult, Row};

/// 审计日志查询条件（均为可选，组合为 AND）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub action_type: Option<AuditActionType>,
}

impl AuditLogFilter {
    pub fn item(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Default::default()
        }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT log_id, timestamp, user_id, action_type, item_id, details FROM audit_log";

impl AuditLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 log_id 查询单条记录
    pub fn find_by_id(&self, log_id: &str) -> RepositoryResult<Option<AuditRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE log_id = ?1", SELECT_COLUMNS))?;

        match stmt.query_row(params![log_id], map_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询闭区间 [start, end] 内的记录，按时间升序
    pub fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &AuditLogFilter,
    ) -> RepositoryResult<Vec<AuditRecord>> {
        let mut sql = format!("{} WHERE timestamp BETWEEN ?1 AND ?2", SELECT_COLUMNS);
        let mut values = vec![format_timestamp(&start), format_timestamp(&end)];

        if let Some(item_id) = &filter.item_id {
            values.push(item_id.clone());
            sql.push_str(&format!(" AND item_id = ?{}", values.len()));
        }
        if let Some(user_id) = &filter.user_id {
            values.push(user_id.clone());
            sql.push_str(&format!(" AND user_id = ?{}", values.len()));
        }
        if let Some(action_type) = filter.action_type {
            values.push(action_type.as_str().to_string());
            sql.push_str(&format!(" AND action_type = ?{}", values.len()));
        }
        sql.push_str(" ORDER BY timestamp ASC, rowid ASC");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values.iter()), map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    /// 统计记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_row(row: &Row) -> SqliteResult<AuditRecord> {
    let raw_ts: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    let raw_type: String = row.get(3)?;
    let action_type = raw_type
        .parse::<AuditActionType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;

    let raw_details: Option<String> = row.get(5)?;

    Ok(AuditRecord {
        log_id: row.get(0)?,
        timestamp,
        user_id: row.get(2)?,
        action_type,
        item_id: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        details: raw_details
            .map(|raw| AuditDetails::from_stored(&raw))
            .unwrap_or_default(),
    })
}
