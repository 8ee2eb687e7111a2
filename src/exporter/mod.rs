// ==========================================
// 货物装载摆放系统 - 导出层
// ==========================================
// 职责: 摆放清单 → 外部表格
// ==========================================

pub mod arrangement_export;

pub use arrangement_export::{
    coordinates_cell, ArrangementExporter, ExportError, ExportResult, ARRANGEMENT_HEADER,
};
