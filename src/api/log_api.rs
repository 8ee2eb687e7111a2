// ==========================================
// 货物装载摆放系统 - 审计日志查询 API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::AuditRecord;
use crate::repository::audit_log_repo::{AuditLogFilter, AuditLogRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

pub struct LogApi {
    audit_log_repo: Arc<AuditLogRepository>,
}

impl LogApi {
    pub fn new(audit_log_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_log_repo }
    }

    /// 查询 [start, end] 内的审计记录，按时间升序
    ///
    /// # 参数
    /// - filter: itemId / userId / actionType 可选过滤（空白字符串视为未设置）
    pub fn query_logs(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: AuditLogFilter,
    ) -> ApiResult<Vec<AuditRecord>> {
        if start > end {
            return Err(ApiError::InvalidInput(format!(
                "开始时间 {} 晚于结束时间 {}",
                start, end
            )));
        }

        let filter = AuditLogFilter {
            item_id: non_blank(filter.item_id),
            user_id: non_blank(filter.user_id),
            action_type: filter.action_type,
        };
        let records = self.audit_log_repo.find_between(start, end, &filter)?;
        debug!(count = records.len(), ?filter, "审计日志查询完成");
        Ok(records)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
