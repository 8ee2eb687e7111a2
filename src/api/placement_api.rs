// ==========================================
// 货物装载摆放系统 - 摆放 API
// ==========================================
// 职责: 持有物品/容器/区域注册表，对外提供摆放与导出
// 并发: 所有修改操作经同一把写锁串行；查询上次结果只取读锁
// 红线: 审计写入失败不得影响摆放结果返回
// ==========================================

use crate::api::audit_recorder::AuditRecorder;
use crate::api::error::{ApiError, ApiResult};
use crate::config::PlannerConfig;
use crate::domain::action_log::{AuditActionType, AuditDetails, AuditRecord};
use crate::domain::cargo::{Container, Item};
use crate::domain::placement::PlacementManifest;
use crate::engine::placement::PlacementEngine;
use crate::engine::zone_registry::{ZoneNormalizer, ZoneRegistry};
use crate::exporter::ArrangementExporter;
use crate::repository::audit_sink::AuditSink;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, instrument, warn};

// ==========================================
// PlacementStore - 摆放状态
// ==========================================
#[derive(Debug, Default)]
pub struct PlacementStore {
    pub items: Vec<Item>,
    pub containers: Vec<Container>,
    pub registry: ZoneRegistry,
    pub last_manifest: Option<PlacementManifest>,
}

// ==========================================
// PlacementApi - 摆放 API
// ==========================================
pub struct PlacementApi {
    store: RwLock<PlacementStore>,
    engine: PlacementEngine,
    config: PlannerConfig,
    recorder: AuditRecorder,
}

impl PlacementApi {
    /// 创建 PlacementApi
    ///
    /// # 参数
    /// - config: 摆放策略配置（区域大小写、同区域多容器策略、默认操作人）
    /// - audit_sink: 审计写入者，None 表示不记录审计
    pub fn new(config: PlannerConfig, audit_sink: Option<Arc<dyn AuditSink>>) -> Self {
        let registry = ZoneRegistry::new(
            ZoneNormalizer::new(config.zone_case_policy),
            config.duplicate_zone_policy,
        );
        let recorder = AuditRecorder::new(audit_sink, config.default_user_id.clone());

        Self {
            store: RwLock::new(PlacementStore {
                registry,
                ..Default::default()
            }),
            engine: PlacementEngine::new(),
            config,
            recorder,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub(crate) fn recorder(&self) -> &AuditRecorder {
        &self.recorder
    }

    fn read_store(&self) -> ApiResult<RwLockReadGuard<'_, PlacementStore>> {
        self.store
            .read()
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    fn write_store(&self) -> ApiResult<RwLockWriteGuard<'_, PlacementStore>> {
        self.store
            .write()
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    // ==========================================
    // 数据注册
    // ==========================================

    /// 替换全部物品，返回物品数
    ///
    /// 注意：不重建注册表，已落位记录仍然有效
    pub fn add_items(&self, items: Vec<Item>) -> ApiResult<usize> {
        warn_duplicates("itemId", items.iter().map(|i| i.item_id.as_str()));

        let mut store = self.write_store()?;
        store.items = items;
        info!(items = store.items.len(), "物品已注册");
        Ok(store.items.len())
    }

    /// 替换全部容器并重建区域注册表，返回容器数
    pub fn add_containers(&self, containers: Vec<Container>) -> ApiResult<usize> {
        warn_duplicates("containerId", containers.iter().map(|c| c.container_id.as_str()));

        let mut store = self.write_store()?;
        let PlacementStore {
            containers: stored,
            registry,
            ..
        } = &mut *store;
        registry.rebuild(&containers);
        *stored = containers;
        Ok(stored.len())
    }

    // ==========================================
    // 摆放
    // ==========================================

    /// 对当前物品与容器执行一次摆放
    ///
    /// 分配器状态跨调用保留：未重新注册容器时再次调用，已落位物品进入 previously_placed
    #[instrument(skip(self))]
    pub fn optimize_placement(&self, user_id: Option<&str>) -> ApiResult<PlacementManifest> {
        let manifest = {
            let mut store = self.write_store()?;
            let PlacementStore {
                items,
                registry,
                last_manifest,
                ..
            } = &mut *store;

            let manifest = self.engine.place_all(items, registry);
            *last_manifest = Some(manifest.clone());
            manifest
        };

        let user = self.recorder.resolve_user(user_id);
        let mut records: Vec<AuditRecord> = manifest
            .placements
            .iter()
            .map(|p| {
                AuditRecord::new(
                    &user,
                    AuditActionType::Placement,
                    &p.item_id,
                    AuditDetails {
                        from_container: String::new(),
                        to_container: p.container_id.clone(),
                        reason: format!("placed at {},{}", p.start, p.end),
                    },
                )
            })
            .collect();
        records.push(AuditRecord::new(
            &user,
            AuditActionType::OptimizePlacement,
            "",
            AuditDetails::reason(format!(
                "placed {}, unplaced {}, previously placed {}",
                manifest.placements.len(),
                manifest.unplaced.len(),
                manifest.previously_placed.len()
            )),
        ));
        self.recorder.record(&records);

        Ok(manifest)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 上一次摆放结果
    pub fn last_manifest(&self) -> ApiResult<Option<PlacementManifest>> {
        Ok(self.read_store()?.last_manifest.clone())
    }

    pub fn item_count(&self) -> ApiResult<usize> {
        Ok(self.read_store()?.items.len())
    }

    pub fn container_count(&self) -> ApiResult<usize> {
        Ok(self.read_store()?.containers.len())
    }

    /// 已注册的规范化区域名
    pub fn registered_zones(&self) -> ApiResult<Vec<String>> {
        let store = self.read_store()?;
        Ok(store.registry.zones().into_iter().map(str::to_string).collect())
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 上一次摆放结果的 CSV 文本（不重新摆放）
    pub fn export_arrangement_csv(&self) -> ApiResult<String> {
        let store = self.read_store()?;
        let manifest = store
            .last_manifest
            .as_ref()
            .ok_or_else(|| ApiError::NotFound("尚未执行摆放".to_string()))?;
        Ok(ArrangementExporter.to_csv_string(&manifest.placements)?)
    }

    /// 将上一次摆放结果写入文件，返回写出行数
    pub fn export_arrangement<P: AsRef<Path>>(&self, path: P, user_id: Option<&str>) -> ApiResult<usize> {
        let written = {
            let store = self.read_store()?;
            let manifest = store
                .last_manifest
                .as_ref()
                .ok_or_else(|| ApiError::NotFound("尚未执行摆放".to_string()))?;
            ArrangementExporter.write_file(&manifest.placements, path.as_ref())?
        };

        info!(rows = written, path = %path.as_ref().display(), "摆放方案已导出");
        let user = self.recorder.resolve_user(user_id);
        self.recorder.record(&[AuditRecord::new(
            &user,
            AuditActionType::ExportArrangement,
            "",
            AuditDetails::reason(format!("exported {} rows to {}", written, path.as_ref().display())),
        )]);

        Ok(written)
    }
}

impl Default for PlacementApi {
    fn default() -> Self {
        Self::new(PlannerConfig::default(), None)
    }
}

fn warn_duplicates<'a>(field: &str, ids: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!(field, id, "ID 重复，后者将覆盖前者的落位记录");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, zone: &str, side: f64, priority: i32) -> Item {
        Item {
            item_id: id.to_string(),
            name: id.to_string(),
            width: side,
            depth: side,
            height: side,
            mass: 1.0,
            priority,
            expiry_date: None,
            usage_limit: 0,
            preferred_zone: zone.to_string(),
        }
    }

    fn container(id: &str, zone: &str, side: f64) -> Container {
        Container {
            container_id: id.to_string(),
            zone: zone.to_string(),
            width: side,
            depth: side,
            height: side,
        }
    }

    #[test]
    fn test_optimize_then_export() {
        let api = PlacementApi::default();
        api.add_containers(vec![container("contA", "A", 10.0)]).unwrap();
        api.add_items(vec![item("001", "A", 1.0, 50)]).unwrap();

        let manifest = api.optimize_placement(None).unwrap();
        assert!(manifest.success);
        assert_eq!(manifest.placements[0].container_id, "contA");

        let csv = api.export_arrangement_csv().unwrap();
        assert!(csv.starts_with("Item ID,Zone,"));
        assert!(csv.contains("001,A,"));
    }

    #[test]
    fn test_export_before_optimize_is_not_found() {
        let api = PlacementApi::default();
        assert!(matches!(api.export_arrangement_csv(), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_add_containers_rebuilds_registry() {
        let api = PlacementApi::default();
        api.add_containers(vec![container("contA", "A", 10.0)]).unwrap();
        api.add_items(vec![item("001", "A", 1.0, 50)]).unwrap();
        api.optimize_placement(None).unwrap();

        let second = api.optimize_placement(None).unwrap();
        assert!(second.placements.is_empty());
        assert_eq!(second.previously_placed, vec!["001".to_string()]);

        api.add_containers(vec![container("contB", "B", 10.0), container("contA", "A", 10.0)])
            .unwrap();
        assert_eq!(api.registered_zones().unwrap(), vec!["A", "B"]);
        let third = api.optimize_placement(None).unwrap();
        assert_eq!(third.placed_count(), 1);
    }

    #[test]
    fn test_uppercase_policy_matches_zones_case_insensitively() {
        let config = PlannerConfig {
            zone_case_policy: crate::domain::types::ZoneCasePolicy::Uppercase,
            ..Default::default()
        };
        let api = PlacementApi::new(config, None);
        api.add_containers(vec![container("contA", " crew quarters ", 10.0)]).unwrap();
        api.add_items(vec![item("001", "Crew Quarters", 1.0, 50)]).unwrap();

        let manifest = api.optimize_placement(Some("astro")).unwrap();
        assert_eq!(manifest.placements[0].zone, "CREW QUARTERS");
    }
}
