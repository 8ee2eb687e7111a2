// ==========================================
// 货物装载摆放系统 - 审计写入接口
// ==========================================
// 职责: 定义审计写入 trait，API 层只依赖该 trait
// 红线: 调用方负责吞掉写入错误，摆放结果照常返回
// ==========================================

use crate::domain::action_log::AuditRecord;
use crate::repository::audit_log_repo::AuditLogRepository;
use crate::repository::error::RepositoryResult;

/// 审计写入者
pub trait AuditSink: Send + Sync {
    /// 追加一条记录
    fn append(&self, record: &AuditRecord) -> RepositoryResult<()>;

    /// 追加一批记录，返回写入条数
    fn append_batch(&self, records: &[AuditRecord]) -> RepositoryResult<usize> {
        for record in records {
            self.append(record)?;
        }
        Ok(records.len())
    }
}

impl AuditSink for AuditLogRepository {
    fn append(&self, record: &AuditRecord) -> RepositoryResult<()> {
        self.insert(record).map(|_| ())
    }

    fn append_batch(&self, records: &[AuditRecord]) -> RepositoryResult<usize> {
        self.batch_insert(records)
    }
}

/// 空操作审计写入者
///
/// 用于不需要持久化审计的场景（如单元测试、纯库调用）
#[derive(Debug, Clone, Default)]
pub struct NoOpAuditSink;

impl AuditSink for NoOpAuditSink {
    fn append(&self, record: &AuditRecord) -> RepositoryResult<()> {
        tracing::debug!(
            action_type = %record.action_type,
            item_id = %record.item_id,
            "NoOpAuditSink: 跳过审计写入"
        );
        Ok(())
    }
}
