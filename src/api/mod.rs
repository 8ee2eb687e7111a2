// ==========================================
// 货物装载摆放系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与库调用方使用
// ==========================================

pub mod audit_recorder;
pub mod error;
pub mod import_api;
pub mod log_api;
pub mod placement_api;

// 重导出核心类型
pub use audit_recorder::AuditRecorder;
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use log_api::LogApi;
pub use placement_api::{PlacementApi, PlacementStore};
