// ==========================================
// 货物装载摆放系统 - 配置层
// ==========================================
// 职责: 摆放策略配置加载
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult, PlannerConfig};
