// ==========================================
// 课表日历导出系统 - 导入层
// ==========================================
// 职责: 表格文件 → 工作表网格
// 支持: Excel (.xlsx/.xlsm/.xls/.ods), CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod file_parser_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use file_parser_trait::{FileParser, SheetGrid};
