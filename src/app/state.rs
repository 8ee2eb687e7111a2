// ==========================================
// 货物装载摆放系统 - 应用状态
// ==========================================
// 职责: 打开数据库、加载配置、组装仓储与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, ImportApi, LogApi, PlacementApi};
use crate::config::{ConfigManager, PlannerConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{AuditLogRepository, AuditSink};

/// 应用状态
///
/// 所有 API 共享同一个数据库连接（审计日志 + 配置）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 加载时生效的摆放策略配置
    pub config: PlannerConfig,

    /// 摆放 API（持有物品/容器/注册表）
    pub placement_api: Arc<PlacementApi>,

    /// 导入 API
    pub import_api: Arc<ImportApi>,

    /// 审计日志查询 API
    pub log_api: Arc<LogApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 审计日志仓储
    pub audit_log_repo: Arc<AuditLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 从 config_kv 加载摆放策略配置
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        init_schema(&conn)
            .map_err(|e| ApiError::DatabaseError(format!("数据库建表失败: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let config = config_manager.load_planner_config()?;
        tracing::info!(
            zone_case_policy = %config.zone_case_policy,
            duplicate_zone_policy = %config.duplicate_zone_policy,
            "摆放策略配置已生效"
        );

        let audit_log_repo = Arc::new(AuditLogRepository::new(conn));
        let audit_sink: Arc<dyn AuditSink> = audit_log_repo.clone();

        let placement_api = Arc::new(PlacementApi::new(config.clone(), Some(audit_sink)));
        let import_api = Arc::new(ImportApi::new(placement_api.clone()));
        let log_api = Arc::new(LogApi::new(audit_log_repo.clone()));

        Ok(Self {
            db_path,
            config,
            placement_api,
            import_api,
            log_api,
            config_manager,
            audit_log_repo,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 STOWAGE_PLANNER_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STOWAGE_PLANNER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stowage_planner.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("stowage-planner");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("stowage_planner.db");
        }
    }

    path.to_string_lossy().to_string()
}
