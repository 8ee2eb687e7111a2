// ==========================================
// 货物装载摆放系统 - 物品/容器导入器
// ==========================================
// 流程: 解析 → 必需列校验 → 逐行映射 → 汇总报告
// 红线: 行级错误只剔除该行并记录行号，其余行照常导入
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, UniversalFileParser};
use crate::importer::importer_trait::{RawTable, RecordMapper};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// RowError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,      // 数据行号（从 1 开始）
    pub message: String, // 错误描述
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport<T> {
    pub total_rows: usize,
    pub records: Vec<T>,
    pub errors: Vec<RowError>,
}

impl<T> ImportReport<T> {
    /// 全部行导入成功
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn imported(&self) -> usize {
        self.records.len()
    }

    pub fn message(&self) -> &'static str {
        if self.success() {
            "导入成功"
        } else {
            "部分行无法导入"
        }
    }
}

// ==========================================
// CargoImporter - 导入器
// ==========================================
pub struct CargoImporter;

impl CargoImporter {
    /// 从文件导入（.csv/.xlsx/.xls）
    #[instrument(skip_all, fields(file_path = %file_path.as_ref().display()))]
    pub fn import_file<M, P>(&self, file_path: P, mapper: &M) -> ImportResult<ImportReport<M::Record>>
    where
        M: RecordMapper,
        P: AsRef<Path>,
    {
        let table = UniversalFileParser.parse(file_path.as_ref())?;
        self.map_table(table, mapper)
    }

    /// 从内存中的 CSV 文本导入
    pub fn import_csv_str<M>(&self, contents: &str, mapper: &M) -> ImportResult<ImportReport<M::Record>>
    where
        M: RecordMapper,
    {
        let table = CsvParser.parse_str(contents)?;
        self.map_table(table, mapper)
    }

    /// 必需列校验 + 逐行映射
    pub fn map_table<M>(&self, table: RawTable, mapper: &M) -> ImportResult<ImportReport<M::Record>>
    where
        M: RecordMapper,
    {
        let missing = table.missing_columns(mapper.required_columns());
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        let total_rows = table.rows.len();
        let mut records = Vec::with_capacity(total_rows);
        let mut errors = Vec::new();

        for (row_number, row) in &table.rows {
            let row_number = *row_number;
            match mapper.map_row(row, row_number) {
                Ok(record) => records.push(record),
                Err(e) if e.is_row_level() => {
                    warn!(row_number, error = %e, "行校验失败，已剔除");
                    errors.push(RowError {
                        row: row_number,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            total_rows,
            imported = records.len(),
            failed = errors.len(),
            "导入映射完成"
        );

        Ok(ImportReport {
            total_rows,
            records,
            errors,
        })
    }
}
