// ==========================================
// 货物装载摆放系统 - 物品与容器领域模型
// ==========================================
// 对齐: 导入表格列名 (itemId, preferredZone, containerId ...)
// 红线: 提交摆放后物品不可变
// ==========================================

use crate::domain::types::{Dimensions, Volume};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Item - 待摆放物品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,                  // 物品ID（唯一）
    pub name: String,                     // 物品名称
    pub width: f64,                       // 宽度
    pub depth: f64,                       // 深度
    pub height: f64,                      // 高度
    #[serde(default)]
    pub mass: f64,                        // 质量
    pub priority: i32,                    // 优先级 [1, 100]
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,   // 过期日期
    #[serde(default)]
    pub usage_limit: u32,                 // 可使用次数
    pub preferred_zone: String,           // 期望区域
}

impl Item {
    /// 物品外形尺寸（不旋转）
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.depth, self.height)
    }
}

// ==========================================
// Container - 存储容器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub container_id: String, // 容器ID（唯一）
    pub zone: String,         // 所属区域（允许多个容器共用）
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Container {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.depth, self.height)
    }

    /// 容器内部空间（原点为 (0,0,0)）
    pub fn volume(&self) -> Volume {
        Volume::from_extents(self.dimensions())
    }
}
