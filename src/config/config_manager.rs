// ==========================================
// 货物装载摆放系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)，与审计日志同库
// 约定: 缺失键取默认值；存在但无法解析的值直接报错
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::{DuplicateZonePolicy, ZoneCasePolicy};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// 默认审计操作人
pub const DEFAULT_USER_ID: &str = "system";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("配置读取失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置值无效 (key={key}, value={value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// PlannerConfig - 摆放策略配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConfig {
    pub zone_case_policy: ZoneCasePolicy,
    pub duplicate_zone_policy: DuplicateZonePolicy,
    pub default_user_id: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            zone_case_policy: ZoneCasePolicy::default(),
            duplicate_zone_policy: DuplicateZonePolicy::default(),
            default_user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开指定数据库文件
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与审计仓储共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> ConfigResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// global scope 全部配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    // ===== 摆放策略配置 =====

    /// 加载摆放策略配置
    pub fn load_planner_config(&self) -> ConfigResult<PlannerConfig> {
        let defaults = PlannerConfig::default();

        let zone_case_policy = self
            .parse_value(config_keys::ZONE_CASE_POLICY)?
            .unwrap_or(defaults.zone_case_policy);
        let duplicate_zone_policy = self
            .parse_value(config_keys::DUPLICATE_ZONE_POLICY)?
            .unwrap_or(defaults.duplicate_zone_policy);
        let default_user_id = self
            .get_global_config_value(config_keys::DEFAULT_USER_ID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_user_id);

        let config = PlannerConfig {
            zone_case_policy,
            duplicate_zone_policy,
            default_user_id,
        };
        debug!(?config, "摆放策略配置已加载");
        Ok(config)
    }

    fn parse_value<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: std::str::FromStr<Err = String>,
    {
        match self.get_global_config_value(key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|message| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                    message,
                }),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const ZONE_CASE_POLICY: &str = "zone_case_policy";
    pub const DUPLICATE_ZONE_POLICY: &str = "duplicate_zone_policy";
    pub const DEFAULT_USER_ID: &str = "default_user_id";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = manager().load_planner_config().unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.default_user_id, "system");
    }

    #[test]
    fn test_overrides_are_read() {
        let mgr = manager();
        mgr.set_global_config_value(config_keys::ZONE_CASE_POLICY, "UPPERCASE").unwrap();
        mgr.set_global_config_value(config_keys::DUPLICATE_ZONE_POLICY, "AGGREGATE").unwrap();
        mgr.set_global_config_value(config_keys::DEFAULT_USER_ID, "astro-7").unwrap();

        let config = mgr.load_planner_config().unwrap();
        assert_eq!(config.zone_case_policy, ZoneCasePolicy::Uppercase);
        assert_eq!(config.duplicate_zone_policy, DuplicateZonePolicy::Aggregate);
        assert_eq!(config.default_user_id, "astro-7");
        assert_eq!(mgr.get_config_snapshot().unwrap().len(), 3);
    }

    #[test]
    fn test_unparsable_value_is_error() {
        let mgr = manager();
        mgr.set_global_config_value(config_keys::DUPLICATE_ZONE_POLICY, "FIRST_WINS").unwrap();

        let err = mgr.load_planner_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "duplicate_zone_policy"));
    }
}
