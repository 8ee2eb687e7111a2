// ==========================================
// 货物装载摆放系统 - 八叉树空间分配器
// ==========================================
// 职责: 管理单个容器的体积划分，为物品包围盒寻找空闲空间
// 策略: 首次适配 + 固定深度 + 不回溯 + 不旋转
// ==========================================
// 存储: 节点数组 (arena)，节点按下标寻址；
//       8 个子节点连续存放，父节点仅记录首个子节点下标
// 红线: 细分不可逆；占用节点必为叶子；有子节点的节点从不被直接占用
// ==========================================

use crate::domain::types::{Coordinates, Dimensions, Volume};
use tracing::trace;

/// 最大细分层级（根为 0 层，最多 8^3 = 512 个叶子）
pub const MAX_LEVEL: u8 = 3;

/// 每次细分产生的子节点数
pub const OCTANT_COUNT: usize = 8;

/// 节点下标
pub type NodeId = usize;

/// 根节点下标
pub const ROOT: NodeId = 0;

// ==========================================
// Octant - 八叉树节点
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octant {
    pub volume: Volume,
    pub level: u8,
    pub occupied: bool,
    first_child: Option<NodeId>,
}

impl Octant {
    fn new(volume: Volume, level: u8) -> Self {
        Self {
            volume,
            level,
            occupied: false,
            first_child: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// 子节点下标范围（叶子返回 None）
    pub fn children(&self) -> Option<std::ops::Range<NodeId>> {
        self.first_child.map(|first| first..first + OCTANT_COUNT)
    }
}

/// 子节点空间
///
/// 固定枚举顺序：下标 bit0 取宽度(x)方向高半区，bit1 取深度(y)方向高半区，
/// bit2 取高度(z)方向高半区：
/// 0:(低,低,低) 1:(高,低,低) 2:(低,高,低) 3:(高,高,低)
/// 4:(低,低,高) 5:(高,低,高) 6:(低,高,高) 7:(高,高,高)
pub fn octant_volume(parent: &Volume, octant: usize) -> Volume {
    let half = parent.extents.halved();
    let step = |bit: usize, extent: f64| if octant >> bit & 1 == 1 { extent } else { 0.0 };
    let origin = Coordinates::new(
        parent.origin.x + step(0, half.width),
        parent.origin.y + step(1, half.depth),
        parent.origin.z + step(2, half.height),
    );
    Volume::new(origin, half)
}

// ==========================================
// Slot - 分配结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub leaf: NodeId,
    pub start: Coordinates,
    pub end: Coordinates,
}

// ==========================================
// SpaceAllocator - 八叉树空间分配器
// ==========================================
#[derive(Debug, Clone)]
pub struct SpaceAllocator {
    nodes: Vec<Octant>,
}

impl SpaceAllocator {
    /// 以容器内部尺寸创建根节点
    pub fn new(extents: Dimensions) -> Self {
        Self {
            nodes: vec![Octant::new(Volume::from_extents(extents), 0)],
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 为给定尺寸寻找首个可用叶子并标记占用
    ///
    /// 规则：
    /// 1) 未占用叶子且尺寸三向均不超出 → 占用并以叶子原点为起点返回
    /// 2) 未占用叶子放不下且未达最大层级 → 细分为 8 个子节点
    /// 3) 按固定顺序递归子节点，返回首个成功结果
    /// 4) 已占用叶子、最大层级叶子放不下、所有子节点失败 → None
    ///
    /// 失败时保留本次调用中已发生的细分
    pub fn attempt_place(&mut self, dims: &Dimensions) -> Option<Slot> {
        self.place_in(ROOT, dims)
    }

    fn place_in(&mut self, id: NodeId, dims: &Dimensions) -> Option<Slot> {
        let node = self.nodes[id];

        if node.is_leaf() {
            if node.occupied {
                return None;
            }
            if node.volume.admits(dims) {
                self.nodes[id].occupied = true;
                trace!(node = id, level = node.level, "叶子节点占用");
                return Some(Slot {
                    leaf: id,
                    start: node.volume.origin,
                    end: node.volume.origin.offset(dims),
                });
            }
            if node.level >= MAX_LEVEL {
                return None;
            }
            self.subdivide(id);
        }

        let children = self.nodes[id].children()?;
        for child in children {
            if let Some(slot) = self.place_in(child, dims) {
                return Some(slot);
            }
        }
        None
    }

    /// 细分叶子节点（子节点追加到数组末尾，连续存放）
    fn subdivide(&mut self, id: NodeId) {
        let parent = self.nodes[id];
        debug_assert!(parent.is_leaf() && !parent.occupied);

        let first = self.nodes.len();
        self.nodes.extend(
            (0..OCTANT_COUNT).map(|i| Octant::new(octant_volume(&parent.volume, i), parent.level + 1)),
        );
        self.nodes[id].first_child = Some(first);
        trace!(node = id, level = parent.level, first_child = first, "节点细分");
    }

    // ==========================================
    // 查询方法
    // ==========================================

    pub fn root_volume(&self) -> Volume {
        self.nodes[ROOT].volume
    }

    pub fn node(&self, id: NodeId) -> Option<&Octant> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.occupied).count()
    }

    /// 根节点是否已细分
    pub fn is_subdivided(&self) -> bool {
        !self.nodes[ROOT].is_leaf()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn cube(side: f64) -> Dimensions {
        Dimensions::new(side, side, side)
    }

    /// 校验每个有子节点的节点恰好被 8 个子节点无缝无重叠划分
    fn assert_exact_partition(alloc: &SpaceAllocator) {
        for id in 0..alloc.node_count() {
            let node = alloc.node(id).unwrap();
            if node.occupied {
                assert!(node.is_leaf(), "占用节点必须是叶子");
            }
            if let Some(children) = node.children() {
                assert_eq!(children.len(), OCTANT_COUNT);
                let total: f64 = children
                    .clone()
                    .map(|c| alloc.node(c).unwrap().volume.extents.volume())
                    .sum();
                assert!((total - node.volume.extents.volume()).abs() < 1e-9);
                for c in children {
                    let child = alloc.node(c).unwrap();
                    assert_eq!(child.level, node.level + 1);
                    assert!(node
                        .volume
                        .contains_box(&child.volume.origin, &child.volume.far_corner()));
                }
            }
        }
    }

    #[test]
    fn test_first_item_takes_root_when_it_fits() {
        let mut alloc = SpaceAllocator::new(cube(10.0));
        let slot = alloc.attempt_place(&cube(1.0)).unwrap();

        assert_eq!(slot.leaf, ROOT);
        assert_eq!(slot.start, Coordinates::new(0.0, 0.0, 0.0));
        assert_eq!(slot.end, Coordinates::new(1.0, 1.0, 1.0));
        assert!(!alloc.is_subdivided());
    }

    #[test]
    fn test_occupied_leaf_rejects_without_subdividing() {
        let mut alloc = SpaceAllocator::new(cube(10.0));
        assert!(alloc.attempt_place(&cube(6.0)).is_some());
        assert!(alloc.attempt_place(&cube(1.0)).is_none());
        assert_eq!(alloc.node_count(), 1);
    }

    #[test]
    fn test_oversized_item_subdivides_to_max_depth() {
        let mut alloc = SpaceAllocator::new(cube(10.0));
        assert!(alloc.attempt_place(&Dimensions::new(12.0, 1.0, 1.0)).is_none());

        // 1 + 8 + 64 + 512
        assert_eq!(alloc.node_count(), 585);
        assert_eq!(alloc.leaf_count(), 512);
        assert_eq!(alloc.occupied_count(), 0);
        assert_exact_partition(&alloc);

        // 再次失败不再产生新节点
        assert!(alloc.attempt_place(&Dimensions::new(12.0, 1.0, 1.0)).is_none());
        assert_eq!(alloc.node_count(), 585);
    }

    #[test]
    fn test_subdivision_is_permanent() {
        let mut alloc = SpaceAllocator::new(cube(10.0));
        assert!(alloc.attempt_place(&cube(11.0)).is_none());
        // 与整个容器同尺寸的物品已无法放入
        assert!(alloc.attempt_place(&cube(10.0)).is_none());
        assert!(alloc.is_subdivided());
    }

    #[test]
    fn test_fixed_octant_order() {
        let mut alloc = SpaceAllocator::new(cube(10.0));
        assert!(alloc.attempt_place(&cube(11.0)).is_none());

        let starts: Vec<Coordinates> = (0..3)
            .map(|_| alloc.attempt_place(&cube(1.0)).unwrap().start)
            .collect();
        assert_eq!(starts[0], Coordinates::new(0.0, 0.0, 0.0));
        assert_eq!(starts[1], Coordinates::new(1.25, 0.0, 0.0));
        assert_eq!(starts[2], Coordinates::new(0.0, 1.25, 0.0));
    }

    #[test]
    fn test_octant_volume_enumeration() {
        let parent = Volume::from_extents(Dimensions::new(8.0, 4.0, 2.0));
        let v7 = octant_volume(&parent, 7);
        assert_eq!(v7.origin, Coordinates::new(4.0, 2.0, 1.0));
        assert_eq!(v7.extents, Dimensions::new(4.0, 2.0, 1.0));
        let v4 = octant_volume(&parent, 4);
        assert_eq!(v4.origin, Coordinates::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_slot_lies_within_admitting_leaf() {
        let mut alloc = SpaceAllocator::new(Dimensions::new(10.0, 6.0, 4.0));
        assert!(alloc.attempt_place(&cube(20.0)).is_none());
        for _ in 0..40 {
            let slot = alloc.attempt_place(&Dimensions::new(1.0, 0.5, 0.5)).unwrap();
            let leaf = alloc.node(slot.leaf).unwrap();
            assert!(leaf.is_leaf() && leaf.occupied);
            assert!(leaf.volume.contains_box(&slot.start, &slot.end));
        }
        assert_exact_partition(&alloc);
    }

    #[test]
    fn test_zero_volume_container_never_admits() {
        let mut alloc = SpaceAllocator::new(cube(0.0));
        assert!(alloc.attempt_place(&cube(1.0)).is_none());
        assert!(alloc.attempt_place(&cube(0.0)).is_none());
        assert!(alloc.node_count() <= 585);
        assert_eq!(alloc.occupied_count(), 0);
    }

    #[test]
    fn test_capacity_bounded_by_leaf_count() {
        let mut alloc = SpaceAllocator::new(cube(8.0));
        assert!(alloc.attempt_place(&cube(9.0)).is_none());
        let placed = (0..600)
            .filter(|_| alloc.attempt_place(&cube(1.0)).is_some())
            .count();
        assert_eq!(placed, 512);
    }
}
