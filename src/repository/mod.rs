// ==========================================
// 货物装载摆放系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供审计日志的数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod audit_log_repo;
pub mod audit_sink;
pub mod error;

pub use audit_log_repo::{AuditLogFilter, AuditLogRepository};
pub use audit_sink::{AuditSink, NoOpAuditSink};
pub use error::{RepositoryError, RepositoryResult};
