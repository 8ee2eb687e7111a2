// ==========================================
// 货物装载摆放系统 - 审计记录器
// ==========================================
// 职责: 包装 Option<Arc<dyn AuditSink>>，统一操作人解析与失败降级
// 红线: 写入失败只告警，不向调用方传播
// ==========================================

use crate::domain::action_log::AuditRecord;
use crate::repository::audit_sink::AuditSink;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuditRecorder {
    sink: Option<Arc<dyn AuditSink>>,
    default_user_id: String,
}

impl AuditRecorder {
    pub fn new(sink: Option<Arc<dyn AuditSink>>, default_user_id: impl Into<String>) -> Self {
        Self {
            sink,
            default_user_id: default_user_id.into(),
        }
    }

    /// 不记录审计
    pub fn disabled(default_user_id: impl Into<String>) -> Self {
        Self::new(None, default_user_id)
    }

    pub fn is_configured(&self) -> bool {
        self.sink.is_some()
    }

    /// 解析操作人：空白或缺省时使用默认操作人
    pub fn resolve_user(&self, user_id: Option<&str>) -> String {
        user_id
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(self.default_user_id.as_str())
            .to_string()
    }

    /// 追加一批记录，返回成功写入条数（失败为 0）
    pub fn record(&self, records: &[AuditRecord]) -> usize {
        let sink = match &self.sink {
            Some(sink) => sink,
            None => return 0,
        };
        if records.is_empty() {
            return 0;
        }

        match sink.append_batch(records) {
            Ok(written) => {
                debug!(written, "审计记录已写入");
                written
            }
            Err(e) => {
                warn!(error = %e, count = records.len(), "审计写入失败，已忽略");
                0
            }
        }
    }
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("configured", &self.is_configured())
            .field("default_user_id", &self.default_user_id)
            .finish()
    }
}
