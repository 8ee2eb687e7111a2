// ==========================================
// 货物装载摆放系统 - 命令行入口
// ==========================================
// 子命令:
// - place: 导入容器与物品 → 摆放 → 输出 JSON（可选导出 CSV）
// - logs: 按时间范围查询审计日志
// - config: 查看/写入摆放策略配置
// ==========================================

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use stowage_planner::api::PlacementApi;
use stowage_planner::app::{get_default_db_path, AppState};
use stowage_planner::config::{config_keys, ConfigManager};
use stowage_planner::domain::AuditActionType;
use stowage_planner::repository::AuditLogFilter;
use stowage_planner::{logging, DuplicateZonePolicy, ZoneCasePolicy, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "stowage-planner")]
#[command(about = "Priority-ordered cargo placement into zone containers")]
#[command(version)]
struct Cli {
    /// 日志以 JSON 格式输出到 stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import containers and items, run placement and print the manifest
    Place {
        /// Items file (.csv/.xlsx/.xls)
        #[arg(long)]
        items: PathBuf,

        /// Containers file (.csv/.xlsx/.xls)
        #[arg(long)]
        containers: PathBuf,

        /// Write the arrangement CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Actor recorded in the audit log
        #[arg(long)]
        user: Option<String>,

        /// SQLite database path
        #[arg(long)]
        db: Option<String>,
    },

    /// Query audit records between two RFC 3339 timestamps
    Logs {
        #[arg(long)]
        start: DateTime<Utc>,

        #[arg(long)]
        end: DateTime<Utc>,

        #[arg(long)]
        item_id: Option<String>,

        #[arg(long)]
        user_id: Option<String>,

        /// e.g. placement, import_items, optimize_placement
        #[arg(long)]
        action_type: Option<AuditActionType>,

        #[arg(long)]
        db: Option<String>,
    },

    /// Show or change planner configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,

        #[arg(long, global = true)]
        db: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Set a configuration key (zone_case_policy, duplicate_zone_policy, default_user_id)
    Set { key: String, value: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::debug!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Place {
            items,
            containers,
            export,
            user,
            db,
        } => {
            let state = open_state(db)?;
            let user = user.as_deref();

            let containers_report = state
                .import_api
                .import_containers(&containers, user)
                .with_context(|| format!("导入容器失败: {}", containers.display()))?;
            let items_report = state
                .import_api
                .import_items(&items, user)
                .with_context(|| format!("导入物品失败: {}", items.display()))?;

            let manifest = state.placement_api.optimize_placement(user)?;

            let mut output = json!({
                "containersImport": containers_report,
                "itemsImport": items_report,
                "manifest": manifest,
            });
            // 导出失败只降级为告警，摆放结果照常输出
            if let Some(path) = export {
                output["export"] = export_summary(&state.placement_api, &path, user);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Logs {
            start,
            end,
            item_id,
            user_id,
            action_type,
            db,
        } => {
            let state = open_state(db)?;
            let filter = AuditLogFilter {
                item_id,
                user_id,
                action_type,
            };
            let records = state.log_api.query_logs(start, end, filter)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Config { action, db } => {
            let db_path = db.unwrap_or_else(get_default_db_path);
            let manager = ConfigManager::new(&db_path)?;

            match action {
                ConfigAction::Show => {}
                ConfigAction::Set { key, value } => {
                    match key.as_str() {
                        config_keys::ZONE_CASE_POLICY => {
                            value.parse::<ZoneCasePolicy>().map_err(anyhow::Error::msg)?;
                        }
                        config_keys::DUPLICATE_ZONE_POLICY => {
                            value.parse::<DuplicateZonePolicy>().map_err(anyhow::Error::msg)?;
                        }
                        config_keys::DEFAULT_USER_ID => {}
                        other => anyhow::bail!("未知的配置键: {}", other),
                    }
                    manager.set_global_config_value(&key, value.trim())?;
                }
            }

            let config = manager.load_planner_config()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// 导出摆放结果，成功返回行数，失败返回错误描述
fn export_summary(api: &PlacementApi, path: &Path, user: Option<&str>) -> Value {
    match api.export_arrangement(path, user) {
        Ok(rows) => {
            eprintln!("已导出 {} 行到 {}", rows, path.display());
            json!({ "path": path.display().to_string(), "rows": rows })
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "导出失败，摆放结果不受影响");
            json!({ "path": path.display().to_string(), "exportError": e.to_string() })
        }
    }
}

fn open_state(db: Option<String>) -> anyhow::Result<AppState> {
    let db_path = db.unwrap_or_else(get_default_db_path);
    AppState::new(db_path.clone()).with_context(|| format!("无法初始化数据库: {}", db_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_planner::domain::{Container, Item};

    fn placed_api() -> PlacementApi {
        let api = PlacementApi::default();
        api.add_containers(vec![Container {
            container_id: "contA".to_string(),
            zone: "A".to_string(),
            width: 10.0,
            depth: 10.0,
            height: 10.0,
        }])
        .unwrap();
        api.add_items(vec![Item {
            item_id: "001".to_string(),
            name: "Food Packet".to_string(),
            width: 1.0,
            depth: 1.0,
            height: 1.0,
            mass: 1.0,
            priority: 50,
            expiry_date: None,
            usage_limit: 1,
            preferred_zone: "A".to_string(),
        }])
        .unwrap();
        api.optimize_placement(None).unwrap();
        api
    }

    #[test]
    fn test_export_failure_keeps_manifest() {
        let api = placed_api();

        let summary = export_summary(&api, Path::new("/nonexistent_dir/out.csv"), None);

        assert!(summary["exportError"].is_string());
        assert!(summary.get("rows").is_none());
        let manifest = api.last_manifest().unwrap().unwrap();
        assert_eq!(manifest.placements.len(), 1);
    }

    #[test]
    fn test_export_success_reports_rows() {
        let api = placed_api();
        let dir = tempfile::tempdir().unwrap();

        let summary = export_summary(&api, &dir.path().join("out.csv"), None);

        assert_eq!(summary["rows"], 1);
        assert!(summary.get("exportError").is_none());
    }
}
