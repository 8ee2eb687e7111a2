// ==========================================
// 货物装载摆放系统 - 摆放引擎
// ==========================================
// 职责: 排序物品 → 查询区域 → 八叉树分配 → 汇总清单
// 输入: 物品列表 + 区域注册表（会被修改）
// 输出: PlacementManifest
// ==========================================
// 红线: 区域缺失/空间不足不报错，仅记入 unplaced
// 红线: success 只反映数据集是否非空
// ==========================================

use crate::domain::cargo::Item;
use crate::domain::placement::{PlacementManifest, PlacementRecord, UnplacedItem};
use crate::domain::types::UnplacedReason;
use crate::engine::priority::PrioritySorter;
use crate::engine::zone_registry::ZoneRegistry;
use tracing::{debug, info, instrument, warn};

// ==========================================
// PlacementEngine - 摆放引擎
// ==========================================
pub struct PlacementEngine {
    sorter: PrioritySorter,
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self {
            sorter: PrioritySorter::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对全部物品执行一次摆放
    ///
    /// 规则：
    /// 1) 物品集或容器集为空 → success=false，不做任何分配
    /// 2) 按 priority 降序（稳定）依次处理
    /// 3) 本注册表生命周期内已落位的物品跳过，记入 previously_placed
    /// 4) 区域无分配器 → unplaced(no_zone_allocator)
    /// 5) 区域内各容器按注册顺序尝试，首个成功者落位；全部失败 → unplaced(no_fit)
    ///
    /// 注意：分配器状态跨调用保留，重复调用不是幂等的
    #[instrument(skip_all, fields(
        items_count = items.len(),
        containers_count = registry.container_count()
    ))]
    pub fn place_all(&self, items: &[Item], registry: &mut ZoneRegistry) -> PlacementManifest {
        if items.is_empty() || registry.container_count() == 0 {
            warn!("物品或容器为空，跳过摆放");
            return PlacementManifest::empty_datasets();
        }

        let mut manifest = PlacementManifest {
            success: true,
            ..Default::default()
        };

        for item in self.sorter.sort(items) {
            if registry.is_placed(&item.item_id) {
                debug!(item_id = %item.item_id, "物品已在先前摆放中落位，跳过");
                manifest.previously_placed.push(item.item_id.clone());
                continue;
            }

            let zone = registry.normalize(&item.preferred_zone);
            match self.place_one(item, &zone, registry) {
                Ok(record) => {
                    registry.record_placement(&record);
                    manifest.placements.push(record);
                }
                Err(reason) => {
                    manifest.unplaced.push(UnplacedItem {
                        item_id: item.item_id.clone(),
                        zone,
                        reason,
                    });
                }
            }
        }

        info!(
            placed = manifest.placements.len(),
            unplaced = manifest.unplaced.len(),
            previously_placed = manifest.previously_placed.len(),
            "摆放完成"
        );
        manifest
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn place_one(
        &self,
        item: &Item,
        zone: &str,
        registry: &mut ZoneRegistry,
    ) -> Result<PlacementRecord, UnplacedReason> {
        let entries = match registry.lookup_mut(zone) {
            Some(entries) => entries,
            None => {
                warn!(item_id = %item.item_id, zone = %zone, "区域没有对应容器");
                return Err(UnplacedReason::NoZoneAllocator);
            }
        };

        let dims = item.dimensions();
        for entry in entries.iter_mut() {
            if let Some(slot) = entry.allocator.attempt_place(&dims) {
                debug!(
                    item_id = %item.item_id,
                    container_id = %entry.container_id,
                    leaf = slot.leaf,
                    "物品落位"
                );
                return Ok(PlacementRecord {
                    item_id: item.item_id.clone(),
                    zone: zone.to_string(),
                    container_id: entry.container_id.clone(),
                    start: slot.start,
                    end: slot.end,
                });
            }
        }

        debug!(item_id = %item.item_id, zone = %zone, "区域内无可用空间");
        Err(UnplacedReason::NoFit)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}
