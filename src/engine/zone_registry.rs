// ==========================================
// 货物装载摆放系统 - 区域注册表
// ==========================================
// 职责: 区域名 → 空间分配器 映射
// 生命周期: 每次注册容器时整体重建，不与旧注册表合并
// 红线: 写入与查询使用同一个 ZoneNormalizer
// ==========================================

use crate::domain::cargo::Container;
use crate::domain::placement::PlacementRecord;
use crate::domain::types::{DuplicateZonePolicy, ZoneCasePolicy};
use crate::engine::octree::SpaceAllocator;
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// ZoneNormalizer - 区域名规范化
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneNormalizer {
    case_policy: ZoneCasePolicy,
}

impl ZoneNormalizer {
    pub fn new(case_policy: ZoneCasePolicy) -> Self {
        Self { case_policy }
    }

    pub fn case_policy(&self) -> ZoneCasePolicy {
        self.case_policy
    }

    /// 去除首尾空白，再按大小写策略处理
    pub fn normalize(&self, zone: &str) -> String {
        let trimmed = zone.trim();
        match self.case_policy {
            ZoneCasePolicy::Preserve => trimmed.to_string(),
            ZoneCasePolicy::Uppercase => trimmed.to_uppercase(),
        }
    }
}

// ==========================================
// ContainerAllocator - 单个容器的分配器
// ==========================================
#[derive(Debug, Clone)]
pub struct ContainerAllocator {
    pub container_id: String,
    pub allocator: SpaceAllocator,
}

// ==========================================
// ZoneRegistry - 区域注册表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    normalizer: ZoneNormalizer,
    duplicate_policy: DuplicateZonePolicy,
    zones: HashMap<String, Vec<ContainerAllocator>>,
    container_count: usize,
    // 本注册表生命周期内已落位的物品（重建时清空）
    placed: HashMap<String, PlacementRecord>,
}

impl ZoneRegistry {
    pub fn new(normalizer: ZoneNormalizer, duplicate_policy: DuplicateZonePolicy) -> Self {
        Self {
            normalizer,
            duplicate_policy,
            ..Default::default()
        }
    }

    /// 以给定容器集合重建注册表
    pub fn from_containers(
        containers: &[Container],
        normalizer: ZoneNormalizer,
        duplicate_policy: DuplicateZonePolicy,
    ) -> Self {
        let mut registry = Self::new(normalizer, duplicate_policy);
        registry.rebuild(containers);
        registry
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 丢弃现有映射与落位记录，为每个容器创建新的根分配器
    ///
    /// 同一规范化区域出现多个容器时：
    /// - LastWriteWins: 后者整体覆盖前者
    /// - Aggregate: 按注册顺序全部保留
    pub fn rebuild(&mut self, containers: &[Container]) {
        self.zones.clear();
        self.placed.clear();
        self.container_count = containers.len();

        for container in containers {
            let zone = self.normalizer.normalize(&container.zone);
            let entry = ContainerAllocator {
                container_id: container.container_id.clone(),
                allocator: SpaceAllocator::new(container.dimensions()),
            };

            let slot = self.zones.entry(zone.clone()).or_default();
            if !slot.is_empty() && self.duplicate_policy == DuplicateZonePolicy::LastWriteWins {
                warn!(
                    zone = %zone,
                    replaced = %slot[0].container_id,
                    container_id = %container.container_id,
                    "区域已存在容器，后注册者覆盖"
                );
                slot.clear();
            }
            slot.push(entry);

            if !container.dimensions().is_positive() {
                debug!(container_id = %container.container_id, "容器尺寸退化，将不接纳任何物品");
            }
        }

        info!(
            containers = self.container_count,
            zones = self.zones.len(),
            policy = %self.duplicate_policy,
            "区域注册表已重建"
        );
    }

    /// 查询区域的首个分配器
    pub fn lookup(&self, zone: &str) -> Option<&ContainerAllocator> {
        self.zones
            .get(&self.normalizer.normalize(zone))
            .and_then(|entries| entries.first())
    }

    /// 查询区域的全部分配器（可变，按注册顺序）
    pub fn lookup_mut(&mut self, zone: &str) -> Option<&mut [ContainerAllocator]> {
        let key = self.normalizer.normalize(zone);
        self.zones
            .get_mut(&key)
            .filter(|entries| !entries.is_empty())
            .map(|entries| entries.as_mut_slice())
    }

    // ==========================================
    // 落位记录
    // ==========================================

    pub fn record_placement(&mut self, record: &PlacementRecord) {
        self.placed.insert(record.item_id.clone(), record.clone());
    }

    pub fn placement_of(&self, item_id: &str) -> Option<&PlacementRecord> {
        self.placed.get(item_id)
    }

    pub fn is_placed(&self, item_id: &str) -> bool {
        self.placed.contains_key(item_id)
    }

    // ==========================================
    // 查询方法
    // ==========================================

    pub fn normalizer(&self) -> &ZoneNormalizer {
        &self.normalizer
    }

    pub fn normalize(&self, zone: &str) -> String {
        self.normalizer.normalize(zone)
    }

    /// 注册时的容器总数（含被覆盖的容器）
    pub fn container_count(&self) -> usize {
        self.container_count
    }

    /// 已注册区域（排序后）
    pub fn zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = self.zones.keys().map(String::as_str).collect();
        zones.sort_unstable();
        zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
