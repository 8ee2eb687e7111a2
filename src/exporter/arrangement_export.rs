// ==========================================
// 货物装载摆放系统 - 摆放方案导出
// ==========================================
// 格式: CSV，每条摆放记录一行
// 列: Item ID, Zone, "(W1,D1,H1),(W2,D2,H2)"
// ==========================================

use crate::domain::placement::PlacementRecord;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// 导出表头
pub const ARRANGEMENT_HEADER: [&str; 3] = ["Item ID", "Zone", "Coordinates (W1,D1,H1),(W2,D2,H2)"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("暂无可导出的摆放记录")]
    NothingToExport,

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 坐标列文本，如 "(0.0,0.0,0.0),(1.0,1.0,1.0)"
pub fn coordinates_cell(record: &PlacementRecord) -> String {
    format!("{},{}", record.start, record.end)
}

// ==========================================
// ArrangementExporter - 摆放方案导出器
// ==========================================
pub struct ArrangementExporter;

impl ArrangementExporter {
    /// 按处理顺序写出摆放记录，返回写出的行数
    pub fn write_csv<W: Write>(&self, records: &[PlacementRecord], writer: W) -> ExportResult<usize> {
        if records.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let mut csv_writer = WriterBuilder::new().from_writer(writer);
        csv_writer.write_record(ARRANGEMENT_HEADER)?;
        for record in records {
            csv_writer.write_record([
                record.item_id.as_str(),
                record.zone.as_str(),
                coordinates_cell(record).as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(records.len())
    }

    /// 导出为 CSV 文本
    pub fn to_csv_string(&self, records: &[PlacementRecord]) -> ExportResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(records, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// 导出到文件
    pub fn write_file<P: AsRef<Path>>(&self, records: &[PlacementRecord], path: P) -> ExportResult<usize> {
        if records.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let file = File::create(path)?;
        self.write_csv(records, file)
    }
}
