// ==========================================
// 摆放 API + 审计日志集成测试
// ==========================================
// 职责: 验证 AppState 组装、审计记录落库、审计失败降级、配置生效
// ==========================================


use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stowage_planner::api::PlacementApi;
use stowage_planner::app::AppState;
use stowage_planner::config::{config_keys, ConfigManager, PlannerConfig};
use stowage_planner::domain::{AuditActionType, AuditRecord, PlacementManifest};
use stowage_planner::logging;
use stowage_planner::repository::{AuditLogFilter, AuditSink, RepositoryError, RepositoryResult};
use test_helpers::{create_test_db, cube_container, cube_item, CONTAINERS_HEADER, ITEMS_HEADER};

/// 总是失败的审计写入者，记录被调用次数
#[derive(Default)]
struct BrokenSink {
    calls: AtomicUsize,
}

impl AuditSink for BrokenSink {
    fn append(&self, _record: &AuditRecord) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::DatabaseConnectionError("disk full".to_string()))
    }
}

#[test]
fn test_audit_failure_does_not_block_placement() {
    let sink = Arc::new(BrokenSink::default());
    let api = PlacementApi::new(PlannerConfig::default(), Some(sink.clone() as Arc<dyn AuditSink>));
    api.add_containers(vec![cube_container("contA", "A", 10.0)]).unwrap();
    api.add_items(vec![cube_item("001", "A", 1.0, 50)]).unwrap();

    let manifest = api.optimize_placement(Some("astro")).unwrap();

    assert!(manifest.success);
    assert_eq!(manifest.placements.len(), 1);
    assert!(sink.calls.load(Ordering::SeqCst) > 0);
}

#[test]
fn test_app_state_records_audit_trail() {
    // 初始化日志系统
    logging::init_test();

    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    let before = Utc::now() - Duration::seconds(1);

    state
        .import_api
        .import_containers_csv(
            &format!("{}\ncontA,Crew Quarters,100,85,200\ncontB,Airlock,50,85,200\n", CONTAINERS_HEADER),
            Some("alice"),
        )
        .unwrap();
    state
        .import_api
        .import_items_csv(
            &format!(
                "{}\n001,Food Packet,10,10,20,5,80,2025-05-20,30,Crew Quarters\n\
                 002,Oxygen Cylinder,15,15,50,30,95,,100,Airlock\n\
                 003,Spare Filter,5,5,5,1,40,,1,Lab\n",
                ITEMS_HEADER
            ),
            Some("alice"),
        )
        .unwrap();

    let manifest = state.placement_api.optimize_placement(Some("bob")).unwrap();
    assert_eq!(manifest.placements.len(), 2);
    assert_eq!(manifest.unplaced.len(), 1);

    let after = Utc::now() + Duration::seconds(1);

    // 2 条导入 + 2 条落位 + 1 条摆放操作
    let all = state
        .log_api
        .query_logs(before, after, AuditLogFilter::default())
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let placements = state
        .log_api
        .query_logs(
            before,
            after,
            AuditLogFilter {
                action_type: Some(AuditActionType::Placement),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(placements.len(), 2);
    assert!(placements.iter().all(|r| r.user_id == "bob"));

    let for_item = state
        .log_api
        .query_logs(before, after, AuditLogFilter::item("002"))
        .unwrap();
    assert_eq!(for_item.len(), 1);
    assert_eq!(for_item[0].details.to_container, "contB");

    let imports_by_alice = state
        .log_api
        .query_logs(
            before,
            after,
            AuditLogFilter {
                user_id: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(imports_by_alice.len(), 2);
    assert_eq!(imports_by_alice[0].action_type, AuditActionType::ImportContainers);
}

#[test]
fn test_default_user_from_config() {
    let (_db_file, db_path) = create_test_db().unwrap();
    {
        let manager = ConfigManager::new(&db_path).unwrap();
        manager
            .set_global_config_value(config_keys::DEFAULT_USER_ID, "ops-console")
            .unwrap();
        manager
            .set_global_config_value(config_keys::ZONE_CASE_POLICY, "UPPERCASE")
            .unwrap();
    }

    let state = AppState::new(db_path).unwrap();
    let before = Utc::now() - Duration::seconds(1);

    state
        .placement_api
        .add_containers(vec![cube_container("contA", "airlock", 10.0)])
        .unwrap();
    state
        .placement_api
        .add_items(vec![cube_item("001", "Airlock", 1.0, 50)])
        .unwrap();
    let manifest = state.placement_api.optimize_placement(None).unwrap();
    assert_eq!(manifest.placements[0].zone, "AIRLOCK");

    let records = state
        .log_api
        .query_logs(before, Utc::now() + Duration::seconds(1), AuditLogFilter::item("001"))
        .unwrap();
    assert_eq!(records[0].user_id, "ops-console");
}

#[test]
fn test_invalid_config_blocks_startup() {
    let (_db_file, db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value(config_keys::DUPLICATE_ZONE_POLICY, "RANDOM")
        .unwrap();

    assert!(AppState::new(db_path).is_err());
}

#[test]
fn test_concurrent_readers_see_last_manifest() {
    let api = Arc::new(PlacementApi::default());
    api.add_containers(vec![cube_container("contA", "A", 10.0)]).unwrap();
    api.add_items(vec![cube_item("001", "A", 1.0, 50)]).unwrap();
    let manifest = api.optimize_placement(None).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let api = api.clone();
            std::thread::spawn(move || api.last_manifest().unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(manifest.clone()));
    }
}

#[test]
fn test_concurrent_optimize_never_places_item_twice() {
    logging::init_test();

    let api = Arc::new(PlacementApi::default());
    api.add_containers(vec![cube_container("contA", "A", 10.0), cube_container("contB", "B", 10.0)])
        .unwrap();

    // 超大物品先行迫使两个容器细分到最深层，其余小物品各占一个叶子
    let mut items = vec![cube_item("giant-a", "A", 11.0, 100), cube_item("giant-b", "B", 11.0, 100)];
    for i in 0..30 {
        let zone = if i % 2 == 0 { "A" } else { "B" };
        items.push(cube_item(&format!("small-{:02}", i), zone, 1.0, 50));
    }
    api.add_items(items).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let api = api.clone();
            std::thread::spawn(move || api.optimize_placement(None).unwrap())
        })
        .collect();
    let manifests: Vec<PlacementManifest> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mut seen = HashSet::new();
    let all: Vec<_> = manifests.iter().flat_map(|m| m.placements.iter()).collect();
    for record in &all {
        assert!(seen.insert(record.item_id.clone()), "{} placed twice", record.item_id);
    }
    assert_eq!(all.len(), 30);

    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            if a.container_id == b.container_id {
                assert!(!a.overlaps(b), "{} overlaps {}", a.item_id, b.item_id);
            }
        }
    }
}

#[test]
fn test_concurrent_rebuild_and_optimize_keep_manifests_consistent() {
    let api = Arc::new(PlacementApi::default());
    let items: Vec<_> = (0..10)
        .map(|i| cube_item(&format!("{:03}", i), "A", 1.0, i))
        .collect();
    api.add_items(items).unwrap();
    api.add_containers(vec![cube_container("contA", "A", 10.0)]).unwrap();

    let handles: Vec<_> = (0..6)
        .map(|n| {
            let api = api.clone();
            std::thread::spawn(move || {
                if n % 2 == 0 {
                    api.add_containers(vec![cube_container("contA", "A", 10.0)]).unwrap();
                }
                api.optimize_placement(None).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let manifest = handle.join().unwrap();
        let ids: HashSet<&str> = manifest.placements.iter().map(|p| p.item_id.as_str()).collect();
        assert_eq!(ids.len(), manifest.placements.len());
        // 单个未细分的根叶子最多容纳一个物品
        assert!(manifest.placements.len() <= 1);
        assert_eq!(
            manifest.placements.len() + manifest.unplaced.len() + manifest.previously_placed.len(),
            10
        );
    }
}
