// ==========================================
// 货物装载摆放系统 - 摆放结果领域模型
// ==========================================
// 用途: PlacementEngine 输出格式 (摆放清单)
// 红线: placements 按处理顺序排列，不按空间位置排列
// ==========================================

use crate::domain::types::{Coordinates, UnplacedReason};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PlacementRecord - 单个物品的摆放记录
// ==========================================
// 不变量: end = start + (width, depth, height)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub item_id: String,      // 物品ID
    pub zone: String,         // 规范化后的区域名
    pub container_id: String, // 实际落位的容器
    pub start: Coordinates,   // 起点坐标
    pub end: Coordinates,     // 终点坐标
}

impl PlacementRecord {
    /// 与另一条记录的包围盒是否有体积重叠（仅接触边界不算重叠）
    pub fn overlaps(&self, other: &PlacementRecord) -> bool {
        self.start.x < other.end.x
            && other.start.x < self.end.x
            && self.start.y < other.end.y
            && other.start.y < self.end.y
            && self.start.z < other.end.z
            && other.start.z < self.end.z
    }
}

// ==========================================
// UnplacedItem - 未摆放物品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedItem {
    pub item_id: String,
    pub zone: String,
    pub reason: UnplacedReason,
}

// ==========================================
// RearrangementStep - 重排步骤 (预留)
// ==========================================
// 当前引擎不计算重排，字段仅为保持清单结构向前兼容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RearrangementStep {
    pub step: u32,
    pub action: RearrangementAction,
    pub item_id: String,
    pub from_container: String,
    pub from_position: Option<Position>,
    pub to_container: Option<String>,
    pub to_position: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RearrangementAction {
    Move,
    Remove,
    Place,
}

impl fmt::Display for RearrangementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RearrangementAction::Move => write!(f, "move"),
            RearrangementAction::Remove => write!(f, "remove"),
            RearrangementAction::Place => write!(f, "place"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub start_coordinates: Coordinates,
    pub end_coordinates: Coordinates,
}

// ==========================================
// PlacementManifest - 摆放清单
// ==========================================
// success 仅表示调用时物品集与容器集均非空，
// 不代表任何/全部物品已摆放；逐项结果见 unplaced / previously_placed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementManifest {
    pub success: bool,
    pub placements: Vec<PlacementRecord>,
    pub rearrangements: Vec<RearrangementStep>,
    #[serde(default)]
    pub unplaced: Vec<UnplacedItem>,
    #[serde(default)]
    pub previously_placed: Vec<String>,
}

impl PlacementManifest {
    /// 数据集为空时的清单
    pub fn empty_datasets() -> Self {
        Self::default()
    }

    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// 本次处理的物品是否全部落位（不含此前已落位的物品）
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn find(&self, item_id: &str) -> Option<&PlacementRecord> {
        self.placements.iter().find(|p| p.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: (f64, f64, f64), end: (f64, f64, f64)) -> PlacementRecord {
        PlacementRecord {
            item_id: id.to_string(),
            zone: "A".to_string(),
            container_id: "C1".to_string(),
            start: Coordinates::new(start.0, start.1, start.2),
            end: Coordinates::new(end.0, end.1, end.2),
        }
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = record("a", (0.0, 0.0, 0.0), (5.0, 5.0, 5.0));
        let b = record("b", (5.0, 0.0, 0.0), (10.0, 5.0, 5.0));
        assert!(!a.overlaps(&b));

        let c = record("c", (4.0, 4.0, 4.0), (6.0, 6.0, 6.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = PlacementManifest {
            success: true,
            placements: vec![record("001", (0.0, 0.0, 0.0), (1.0, 1.0, 1.0))],
            ..Default::default()
        };
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["placements"][0]["itemId"], "001");
        assert_eq!(value["placements"][0]["end"]["z"], 1.0);
        assert!(value["rearrangements"].as_array().unwrap().is_empty());
    }
}
