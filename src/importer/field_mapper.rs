// ==========================================
// 货物装载摆放系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 → Item / Container 映射 + 类型转换 + 行级校验
// 列名: 与导入模板一致 (itemId, preferredZone, containerId ...)
// ==========================================

use crate::domain::cargo::{Container, Item};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{RawRow, RecordMapper};
use chrono::NaiveDate;

/// 物品导入必需列
pub const ITEM_COLUMNS: &[&str] = &[
    "itemId",
    "name",
    "width",
    "depth",
    "height",
    "mass",
    "priority",
    "expiryDate",
    "usageLimit",
    "preferredZone",
];

/// 容器导入必需列
pub const CONTAINER_COLUMNS: &[&str] = &["containerId", "zone", "width", "depth", "height"];

/// 优先级允许范围
pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 100;

// ==========================================
// ItemFieldMapper - 物品字段映射
// ==========================================
pub struct ItemFieldMapper;

impl RecordMapper for ItemFieldMapper {
    type Record = Item;

    fn required_columns(&self) -> &'static [&'static str] {
        ITEM_COLUMNS
    }

    fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<Item> {
        let item_id = require_string(row, "itemId", row_number)?;
        let width = parse_positive(row, "width", row_number)?;
        let depth = parse_positive(row, "depth", row_number)?;
        let height = parse_positive(row, "height", row_number)?;
        let mass = parse_f64(row, "mass", row_number)?;

        let priority = parse_i32(row, "priority", row_number)?;
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
            return Err(ImportError::ValueRangeError {
                row: row_number,
                field: "priority".to_string(),
                value: priority as f64,
                min: PRIORITY_MIN as f64,
                max: PRIORITY_MAX as f64,
            });
        }

        Ok(Item {
            item_id,
            name: get_string(row, "name").unwrap_or_default(),
            width,
            depth,
            height,
            mass,
            priority,
            expiry_date: parse_expiry(row, "expiryDate", row_number)?,
            usage_limit: parse_usage_limit(row, "usageLimit"),
            preferred_zone: row.get("preferredZone").cloned().unwrap_or_default(),
        })
    }
}

// ==========================================
// ContainerFieldMapper - 容器字段映射
// ==========================================
pub struct ContainerFieldMapper;

impl RecordMapper for ContainerFieldMapper {
    type Record = Container;

    fn required_columns(&self) -> &'static [&'static str] {
        CONTAINER_COLUMNS
    }

    fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<Container> {
        Ok(Container {
            container_id: require_string(row, "containerId", row_number)?,
            zone: row.get("zone").cloned().unwrap_or_default(),
            width: parse_positive(row, "width", row_number)?,
            depth: parse_positive(row, "depth", row_number)?,
            height: parse_positive(row, "height", row_number)?,
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 提取非空字符串字段
fn get_string(row: &RawRow, key: &str) -> Option<String> {
    row.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require_string(row: &RawRow, key: &str, row_number: usize) -> ImportResult<String> {
    get_string(row, key).ok_or_else(|| ImportError::MissingField {
        row: row_number,
        field: key.to_string(),
    })
}

/// 解析浮点数（必填）
fn parse_f64(row: &RawRow, key: &str, row_number: usize) -> ImportResult<f64> {
    let value = require_string(row, key, row_number)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ImportError::TypeConversionError {
            row: row_number,
            field: key.to_string(),
            message: format!("无法解析为数值: {}", value),
        }),
    }
}

/// 解析正浮点数（尺寸字段）
fn parse_positive(row: &RawRow, key: &str, row_number: usize) -> ImportResult<f64> {
    let value = parse_f64(row, key, row_number)?;
    if value <= 0.0 {
        return Err(ImportError::NonPositiveValue {
            row: row_number,
            field: key.to_string(),
            value,
        });
    }
    Ok(value)
}

/// 解析整数（必填）
fn parse_i32(row: &RawRow, key: &str, row_number: usize) -> ImportResult<i32> {
    let value = require_string(row, key, row_number)?;
    value
        .parse::<i32>()
        .map_err(|_| ImportError::TypeConversionError {
            row: row_number,
            field: key.to_string(),
            message: format!("无法解析为整数: {}", value),
        })
}

/// 解析过期日期：空值或 "n/a" 视为无过期日期
fn parse_expiry(row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<NaiveDate>> {
    let value = match get_string(row, key) {
        None => return Ok(None),
        Some(v) if v.eq_ignore_ascii_case("n/a") => return Ok(None),
        Some(v) => v,
    };

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ImportError::DateFormatError {
            row: row_number,
            field: key.to_string(),
            value,
        })
}

/// 解析使用次数：取首个空白分隔片段（如 "30 uses"），非数字按 0 处理
fn parse_usage_limit(row: &RawRow, key: &str) -> u32 {
    row.get(key)
        .and_then(|v| v.split_whitespace().next())
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_row(overrides: &[(&str, &str)]) -> RawRow {
        let mut row: RawRow = [
            ("itemId", "001"),
            ("name", "Food Packet"),
            ("width", "10"),
            ("depth", "10"),
            ("height", "20"),
            ("mass", "5"),
            ("priority", "80"),
            ("expiryDate", "2025-05-20"),
            ("usageLimit", "30 uses"),
            ("preferredZone", "Crew Quarters"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in overrides {
            row.insert(k.to_string(), v.to_string());
        }
        row
    }

    #[test]
    fn test_map_valid_item() {
        let item = ItemFieldMapper.map_row(&item_row(&[]), 1).unwrap();
        assert_eq!(item.item_id, "001");
        assert_eq!(item.priority, 80);
        assert_eq!(item.usage_limit, 30);
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2025, 5, 20));
    }

    #[test]
    fn test_priority_out_of_range() {
        let err = ItemFieldMapper
            .map_row(&item_row(&[("priority", "101")]), 4)
            .unwrap_err();
        assert!(matches!(err, ImportError::ValueRangeError { row: 4, .. }));
        assert!(err.is_row_level());
    }

    #[test]
    fn test_expiry_na_and_bad_date() {
        let item = ItemFieldMapper
            .map_row(&item_row(&[("expiryDate", "N/A")]), 1)
            .unwrap();
        assert_eq!(item.expiry_date, None);

        let err = ItemFieldMapper
            .map_row(&item_row(&[("expiryDate", "20/05/2025")]), 2)
            .unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { row: 2, .. }));
    }

    #[test]
    fn test_usage_limit_is_lenient() {
        let item = ItemFieldMapper
            .map_row(&item_row(&[("usageLimit", "many")]), 1)
            .unwrap();
        assert_eq!(item.usage_limit, 0);
    }

    #[test]
    fn test_malformed_and_non_positive_dimensions() {
        let err = ItemFieldMapper
            .map_row(&item_row(&[("width", "ten")]), 3)
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 3, .. }));

        let err = ItemFieldMapper
            .map_row(&item_row(&[("height", "0")]), 5)
            .unwrap_err();
        assert!(matches!(err, ImportError::NonPositiveValue { row: 5, .. }));
    }

    #[test]
    fn test_map_container_keeps_raw_zone() {
        let row: RawRow = [
            ("containerId", "contA"),
            ("zone", "Crew Quarters"),
            ("width", "100"),
            ("depth", "85"),
            ("height", "200"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let container = ContainerFieldMapper.map_row(&row, 1).unwrap();
        assert_eq!(container.zone, "Crew Quarters");
        assert_eq!(container.depth, 85.0);
    }
}
