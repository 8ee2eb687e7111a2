// ==========================================
// 货物装载摆放系统 - 导入 API
// ==========================================
// 职责: 表格导入 → 注册到 PlacementApi（整体替换）
// 规则: 至少一行有效时才注册；全部无效时保留原数据
// ==========================================

use crate::api::error::ApiResult;
use crate::api::placement_api::PlacementApi;
use crate::domain::action_log::{AuditActionType, AuditDetails, AuditRecord};
use crate::domain::cargo::{Container, Item};
use crate::importer::{CargoImporter, ContainerFieldMapper, ImportReport, ItemFieldMapper};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 导入API
pub struct ImportApi {
    placement_api: Arc<PlacementApi>,
    importer: CargoImporter,
}

impl ImportApi {
    pub fn new(placement_api: Arc<PlacementApi>) -> Self {
        Self {
            placement_api,
            importer: CargoImporter,
        }
    }

    /// 从文件导入物品（.csv/.xlsx/.xls）
    pub fn import_items<P: AsRef<Path>>(&self, file_path: P, user_id: Option<&str>) -> ApiResult<ImportReport<Item>> {
        let report = self.importer.import_file(file_path, &ItemFieldMapper)?;
        self.register_items(report, user_id)
    }

    /// 从 CSV 文本导入物品
    pub fn import_items_csv(&self, contents: &str, user_id: Option<&str>) -> ApiResult<ImportReport<Item>> {
        let report = self.importer.import_csv_str(contents, &ItemFieldMapper)?;
        self.register_items(report, user_id)
    }

    /// 从文件导入容器（.csv/.xlsx/.xls）
    pub fn import_containers<P: AsRef<Path>>(
        &self,
        file_path: P,
        user_id: Option<&str>,
    ) -> ApiResult<ImportReport<Container>> {
        let report = self.importer.import_file(file_path, &ContainerFieldMapper)?;
        self.register_containers(report, user_id)
    }

    /// 从 CSV 文本导入容器
    pub fn import_containers_csv(
        &self,
        contents: &str,
        user_id: Option<&str>,
    ) -> ApiResult<ImportReport<Container>> {
        let report = self.importer.import_csv_str(contents, &ContainerFieldMapper)?;
        self.register_containers(report, user_id)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn register_items(&self, report: ImportReport<Item>, user_id: Option<&str>) -> ApiResult<ImportReport<Item>> {
        if report.imported() > 0 {
            self.placement_api.add_items(report.records.clone())?;
        } else {
            warn!(total_rows = report.total_rows, "没有有效的物品行，保留原物品集");
        }
        self.record_import(AuditActionType::ImportItems, "items", &report, user_id);
        Ok(report)
    }

    fn register_containers(
        &self,
        report: ImportReport<Container>,
        user_id: Option<&str>,
    ) -> ApiResult<ImportReport<Container>> {
        if report.imported() > 0 {
            self.placement_api.add_containers(report.records.clone())?;
        } else {
            warn!(total_rows = report.total_rows, "没有有效的容器行，保留原容器集");
        }
        self.record_import(AuditActionType::ImportContainers, "containers", &report, user_id);
        Ok(report)
    }

    fn record_import<T>(
        &self,
        action_type: AuditActionType,
        noun: &str,
        report: &ImportReport<T>,
        user_id: Option<&str>,
    ) {
        info!(
            action_type = %action_type,
            imported = report.imported(),
            rejected = report.errors.len(),
            "导入完成"
        );

        let recorder = self.placement_api.recorder();
        let user = recorder.resolve_user(user_id);
        recorder.record(&[AuditRecord::new(
            &user,
            action_type,
            "",
            AuditDetails::reason(format!(
                "Imported {} {}; {} rows rejected.",
                report.imported(),
                noun,
                report.errors.len()
            )),
        )]);
    }
}
