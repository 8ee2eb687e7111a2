// ==========================================
// 货物装载摆放系统 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 必需列校验 → 行映射/校验
// ==========================================

use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始行记录（列名 → 去除首尾空白后的值）
pub type RawRow = HashMap<String, String>;

// ==========================================
// RawTable - 解析后的原始表格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<(usize, RawRow)>, // (数据行号, 行记录)，行号从 1 开始，不含表头
}

impl RawTable {
    /// 返回缺失的必需列（按必需列声明顺序）
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|col| !self.headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格（逗号分隔的空行保留并占用行号）
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 实现者: ItemFieldMapper, ContainerFieldMapper
pub trait RecordMapper: Send + Sync {
    type Record;

    /// 必需列
    fn required_columns(&self) -> &'static [&'static str];

    /// 将一行映射为领域记录
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - row_number: 数据行号（从 1 开始，不含表头）
    fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<Self::Record>;
}
