// ==========================================
// 货物装载摆放系统 - 审计日志领域模型
// ==========================================
// 红线: 只追加，不修改
// 红线: 审计写入失败不得影响摆放结果返回
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ==========================================
// AuditRecord - 审计记录
// ==========================================
// 对齐: audit_log 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub log_id: String,                // 日志ID
    pub timestamp: DateTime<Utc>,      // 操作时间 (UTC)
    pub user_id: String,               // 操作人
    pub action_type: AuditActionType,  // 操作类型
    pub item_id: String,               // 关联物品（操作级记录为空串）
    pub details: AuditDetails,         // 明细
}

impl AuditRecord {
    /// 创建一条当前时间的审计记录
    pub fn new(
        user_id: &str,
        action_type: AuditActionType,
        item_id: &str,
        details: AuditDetails,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            action_type,
            item_id: item_id.to_string(),
            details,
        }
    }
}

// ==========================================
// AuditDetails - 审计明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(default)]
    pub from_container: String,
    #[serde(default)]
    pub to_container: String,
    #[serde(default)]
    pub reason: String,
}

impl AuditDetails {
    /// 仅含原因的明细
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Default::default()
        }
    }

    /// 解析存储的明细文本；历史遗留的纯文本明细整体作为 reason
    pub fn from_stored(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self::reason(raw))
    }
}

// ==========================================
// AuditActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActionType {
    Placement,          // 物品落位
    Retrieval,          // 取用
    Rearrangement,      // 重排
    Disposal,           // 废弃处置
    ImportItems,        // 导入物品
    ImportContainers,   // 导入容器
    OptimizePlacement,  // 执行摆放
    ExportArrangement,  // 导出摆放方案
}

impl AuditActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditActionType::Placement => "placement",
            AuditActionType::Retrieval => "retrieval",
            AuditActionType::Rearrangement => "rearrangement",
            AuditActionType::Disposal => "disposal",
            AuditActionType::ImportItems => "import_items",
            AuditActionType::ImportContainers => "import_containers",
            AuditActionType::OptimizePlacement => "optimize_placement",
            AuditActionType::ExportArrangement => "export_arrangement",
        }
    }
}

impl fmt::Display for AuditActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placement" => Ok(AuditActionType::Placement),
            "retrieval" => Ok(AuditActionType::Retrieval),
            "rearrangement" => Ok(AuditActionType::Rearrangement),
            "disposal" => Ok(AuditActionType::Disposal),
            "import_items" => Ok(AuditActionType::ImportItems),
            "import_containers" => Ok(AuditActionType::ImportContainers),
            "optimize_placement" => Ok(AuditActionType::OptimizePlacement),
            "export_arrangement" => Ok(AuditActionType::ExportArrangement),
            other => Err(format!("未知的操作类型: {}", other)),
        }
    }
}
