// ==========================================
// 导入/导出集成测试
// ==========================================
// 职责: 验证 文件导入 → 摆放 → CSV 导出 的数据流转
// ==========================================


use std::sync::Arc;
use stowage_planner::api::{ApiError, ImportApi, PlacementApi};
use stowage_planner::importer::{CargoImporter, ContainerFieldMapper, ImportError, ItemFieldMapper};
use stowage_planner::logging;
use test_helpers::{write_fixture, CONTAINERS_HEADER, ITEMS_HEADER};

fn items_csv() -> String {
    format!(
        "{}\n\
         001,Food Packet,10,10,20,5,80,2025-05-20,30,Crew Quarters\n\
         002,Oxygen Cylinder,15,15,50,30,95,N/A,100 uses,Airlock\n\
         003,First Aid Kit,20,20,10,2,101,2025-07-10,5,Medical Bay\n\
         004,Water Pouch,5,5,10,1,60,2025-13-01,10,Crew Quarters\n",
        ITEMS_HEADER
    )
}

fn containers_csv() -> String {
    format!(
        "{}\n\
         contA,Crew Quarters,100,85,200\n\
         contB,Airlock,50,85,200\n",
        CONTAINERS_HEADER
    )
}

#[test]
fn test_import_from_csv_files_collects_row_errors() {
    let items_file = write_fixture(".csv", &items_csv());

    let report = CargoImporter
        .import_file(items_file.path(), &ItemFieldMapper)
        .unwrap();

    assert_eq!(report.total_rows, 4);
    assert_eq!(report.imported(), 2);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![3, 4]);
    assert_eq!(report.records[0].usage_limit, 30);
    assert_eq!(report.records[1].usage_limit, 100);
    assert_eq!(report.records[1].expiry_date, None);
}

#[test]
fn test_unsupported_and_missing_files() {
    let txt = write_fixture(".txt", &containers_csv());
    let err = CargoImporter
        .import_file(txt.path(), &ContainerFieldMapper)
        .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));

    let err = CargoImporter
        .import_file("/nonexistent/containers.csv", &ContainerFieldMapper)
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_import_place_export_round() {
    // 初始化日志系统
    logging::init_test();

    let items_file = write_fixture(".csv", &items_csv());
    let containers_file = write_fixture(".csv", &containers_csv());
    let export_dir = tempfile::tempdir().unwrap();
    let export_path = export_dir.path().join("arrangement.csv");

    let placement_api = Arc::new(PlacementApi::default());
    let import_api = ImportApi::new(placement_api.clone());

    import_api.import_containers(containers_file.path(), None).unwrap();
    import_api.import_items(items_file.path(), None).unwrap();

    let manifest = placement_api.optimize_placement(None).unwrap();
    assert!(manifest.success);
    // 002 (p95) 落入 Airlock，001 (p80) 落入 Crew Quarters
    let placed: Vec<&str> = manifest.placements.iter().map(|p| p.item_id.as_str()).collect();
    assert_eq!(placed, vec!["002", "001"]);

    let rows = placement_api.export_arrangement(&export_path, None).unwrap();
    assert_eq!(rows, 2);

    let exported = std::fs::read_to_string(&export_path).unwrap();
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Item ID,Zone,\"Coordinates (W1,D1,H1),(W2,D2,H2)\"");
    assert_eq!(lines[1], "002,Airlock,\"(0.0,0.0,0.0),(15.0,15.0,50.0)\"");
    assert_eq!(lines[2], "001,Crew Quarters,\"(0.0,0.0,0.0),(10.0,10.0,20.0)\"");

    // 导出不会重新摆放
    assert_eq!(placement_api.last_manifest().unwrap(), Some(manifest));
}

#[test]
fn test_export_without_placements_is_not_found() {
    let placement_api = PlacementApi::default();
    let dir = tempfile::tempdir().unwrap();

    let err = placement_api
        .export_arrangement(dir.path().join("out.csv"), None)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // 有摆放但结果为空
    placement_api.optimize_placement(None).unwrap();
    let err = placement_api
        .export_arrangement(dir.path().join("out.csv"), None)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(!dir.path().join("out.csv").exists());
}
