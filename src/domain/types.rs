// ==========================================
// 货物装载摆放系统 - 领域类型定义
// ==========================================
// 职责: 几何值对象 + 策略枚举
// 红线: 坐标计算必须精确 (end = start + 尺寸)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Coordinates - 三维坐标点
// ==========================================
// x 对应宽度方向, y 对应深度方向, z 对应高度方向
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 按分量平移
    pub fn offset(&self, dims: &Dimensions) -> Self {
        Self {
            x: self.x + dims.width,
            y: self.y + dims.depth,
            z: self.z + dims.height,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{})",
            format_coord(self.x),
            format_coord(self.y),
            format_coord(self.z)
        )
    }
}

/// 坐标文本格式：整数值保留一位小数（"5.0"），其余按最短表示输出
pub fn format_coord(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

// ==========================================
// Dimensions - 外形尺寸 (宽/深/高)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// 三个分量均为有限正数
    pub fn is_positive(&self) -> bool {
        [self.width, self.depth, self.height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// 各分量减半
    pub fn halved(&self) -> Self {
        Self {
            width: self.width / 2.0,
            depth: self.depth / 2.0,
            height: self.height / 2.0,
        }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.depth * self.height
    }
}

// ==========================================
// Volume - 轴对齐长方体空间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Volume {
    pub origin: Coordinates,
    pub extents: Dimensions,
}

impl Volume {
    pub fn new(origin: Coordinates, extents: Dimensions) -> Self {
        Self { origin, extents }
    }

    /// 以原点为起点的空间
    pub fn from_extents(extents: Dimensions) -> Self {
        Self {
            origin: Coordinates::default(),
            extents,
        }
    }

    /// 空间远角坐标
    pub fn far_corner(&self) -> Coordinates {
        self.origin.offset(&self.extents)
    }

    /// 判断给定尺寸能否以原点对齐方式放入（不旋转）
    ///
    /// 零体积/退化空间不接纳任何物品
    pub fn admits(&self, dims: &Dimensions) -> bool {
        self.extents.is_positive()
            && dims.is_positive()
            && dims.width <= self.extents.width
            && dims.depth <= self.extents.depth
            && dims.height <= self.extents.height
    }

    /// 判断 [start, end] 包围盒是否完全落在本空间内
    pub fn contains_box(&self, start: &Coordinates, end: &Coordinates) -> bool {
        let far = self.far_corner();
        start.x >= self.origin.x
            && start.y >= self.origin.y
            && start.z >= self.origin.z
            && end.x <= far.x
            && end.y <= far.y
            && end.z <= far.z
    }
}

// ==========================================
// ZoneCasePolicy - 区域名大小写策略
// ==========================================
// 所有区域名在写入和查询时都先 trim，再按此策略处理大小写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneCasePolicy {
    #[default]
    Preserve,  // 仅去除首尾空白，大小写敏感
    Uppercase, // 去除首尾空白后转大写（大小写不敏感）
}

impl fmt::Display for ZoneCasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneCasePolicy::Preserve => write!(f, "PRESERVE"),
            ZoneCasePolicy::Uppercase => write!(f, "UPPERCASE"),
        }
    }
}

impl FromStr for ZoneCasePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRESERVE" => Ok(ZoneCasePolicy::Preserve),
            "UPPERCASE" => Ok(ZoneCasePolicy::Uppercase),
            other => Err(format!("未知的区域大小写策略: {}", other)),
        }
    }
}

// ==========================================
// DuplicateZonePolicy - 同区域多容器策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateZonePolicy {
    #[default]
    LastWriteWins, // 后注册的容器整体覆盖前者
    Aggregate,     // 同区域保留全部容器，按注册顺序依次尝试
}

impl fmt::Display for DuplicateZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateZonePolicy::LastWriteWins => write!(f, "LAST_WRITE_WINS"),
            DuplicateZonePolicy::Aggregate => write!(f, "AGGREGATE"),
        }
    }
}

impl FromStr for DuplicateZonePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LAST_WRITE_WINS" => Ok(DuplicateZonePolicy::LastWriteWins),
            "AGGREGATE" => Ok(DuplicateZonePolicy::Aggregate),
            other => Err(format!("未知的同区域容器策略: {}", other)),
        }
    }
}

// ==========================================
// UnplacedReason - 未摆放原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    NoZoneAllocator, // 目标区域没有注册容器
    NoFit,           // 区域内无可用空间
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::NoZoneAllocator => write!(f, "no_zone_allocator"),
            UnplacedReason::NoFit => write!(f, "no_fit"),
        }
    }
}
