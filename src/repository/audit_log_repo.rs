// ==========================================
// 货物装载摆放系统 - 审计日志数据仓储
// ==========================================
// 表: audit_log（只追加）
// 时间戳: UTC RFC3339 微秒精度，定长文本，字典序即时间序
// ==========================================

mod core;
mod queries;


pub use core::{format_timestamp, AuditLogRepository};
pub use queries::AuditLogFilter;
