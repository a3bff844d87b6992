// ==========================================
// 课表日历导出系统 - 文件解析 Trait
// ==========================================
// 职责: 定义"文件 → 工作表网格"接口（不包含实现）
// 说明: 引擎层只依赖 Grid,不依赖任何具体表格解码库
// ==========================================

use crate::domain::grid::Grid;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// SheetGrid - 单个工作表
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    pub grid: Grid,
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 列出文件中的工作表名称
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>>;

    /// 解析文件为工作表网格列表
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheets: 待解析的工作表;为空表示全部
    ///
    /// # 返回
    /// - Ok(Vec<SheetGrid>): 按文件内顺序排列的工作表
    /// - Err: 文件不存在 / 格式错误 / 指定工作表不存在
    fn parse_sheets(&self, file_path: &Path, sheets: &[String]) -> ImportResult<Vec<SheetGrid>>;
}
