// ==========================================
// 货物装载摆放系统 - 引擎层
// ==========================================
// 职责: 体积分配与摆放顺序规则,不做 IO
// 红线: 所有未摆放物品必须输出 reason
// ==========================================

pub mod octree;
pub mod placement;
pub mod priority;
pub mod zone_registry;

// 重导出核心引擎
pub use octree::{NodeId, Octant, Slot, SpaceAllocator, MAX_LEVEL};
pub use placement::PlacementEngine;
pub use priority::PrioritySorter;
pub use zone_registry::{ContainerAllocator, ZoneNormalizer, ZoneRegistry};
