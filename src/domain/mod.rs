// ==========================================
// 货物装载摆放系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、几何类型、摆放清单
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod cargo;
pub mod placement;
pub mod types;

// 重导出核心类型
pub use action_log::{AuditActionType, AuditDetails, AuditRecord};
pub use cargo::{Container, Item};
pub use placement::{
    PlacementManifest, PlacementRecord, Position, RearrangementAction, RearrangementStep,
    UnplacedItem,
};
pub use types::{
    Coordinates, Dimensions, DuplicateZonePolicy, UnplacedReason, Volume, ZoneCasePolicy,
};
