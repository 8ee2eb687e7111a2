// ==========================================
// 货物装载摆放系统 - 导入层
// ==========================================
// 职责: 外部表格数据 → 物品/容器
// 支持: CSV, Excel
// ==========================================

pub mod cargo_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use cargo_importer::{CargoImporter, ImportReport, RowError};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ContainerFieldMapper, ItemFieldMapper, CONTAINER_COLUMNS, ITEM_COLUMNS};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RawRow, RawTable, RecordMapper};
