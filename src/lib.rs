// ==========================================
// 货物装载摆放系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按优先级把物品摆入期望区域的容器，
//           以八叉树递归细分容器空间
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 审计日志
pub mod repository;

// 引擎层 - 空间分配与摆放规则
pub mod engine;

// 导入层 - 外部表格
pub mod importer;

// 导出层 - 摆放方案
pub mod exporter;

// 配置层 - 摆放策略配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Coordinates, Dimensions, DuplicateZonePolicy, UnplacedReason, Volume, ZoneCasePolicy};

// 领域实体
pub use domain::{
    AuditActionType, AuditDetails, AuditRecord, Container, Item, PlacementManifest,
    PlacementRecord, UnplacedItem,
};

// 引擎
pub use engine::{PlacementEngine, PrioritySorter, SpaceAllocator, ZoneNormalizer, ZoneRegistry};

// API
pub use api::{ApiError, ApiResult, ImportApi, LogApi, PlacementApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "货物装载摆放系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
