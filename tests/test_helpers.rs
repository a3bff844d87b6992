// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构建课表网格、生成 CSV 源文件
// ==========================================

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use timetable_ics::{CellValue, Grid, MergedRange};

// ==========================================
// GridBuilder - 稀疏网格构建器
// ==========================================
#[derive(Default)]
pub struct GridBuilder {
    cells: Vec<(usize, usize, CellValue)>,
    merged: Option<Vec<MergedRange>>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, row: usize, col: usize, value: &str) -> Self {
        self.cells.push((row, col, CellValue::text(value)));
        self
    }

    pub fn value(mut self, row: usize, col: usize, value: CellValue) -> Self {
        self.cells.push((row, col, value));
        self
    }

    pub fn merged(mut self, range: MergedRange) -> Self {
        self.merged.get_or_insert_with(Vec::new).push(range);
        self
    }

    pub fn build(self) -> Grid {
        let height = self.cells.iter().map(|c| c.0 + 1).max().unwrap_or(0);
        let width = self.cells.iter().map(|c| c.1 + 1).max().unwrap_or(0);
        let mut rows = vec![vec![CellValue::Empty; width]; height];
        for (r, c, v) in self.cells {
            rows[r][c] = v;
        }
        let grid = Grid::from_rows(rows);
        match self.merged {
            Some(ranges) => grid.with_merged_ranges(ranges),
            None => grid,
        }
    }

    /// 以 CSV 形式写出（合并信息丢失）
    pub fn to_csv(&self) -> String {
        let height = self.cells.iter().map(|c| c.0 + 1).max().unwrap_or(0);
        let width = self.cells.iter().map(|c| c.1 + 1).max().unwrap_or(0);
        let mut rows = vec![vec![String::new(); width]; height];
        for (r, c, v) in &self.cells {
            rows[*r][*c] = v.to_string();
        }
        rows.iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"
    }
}

/// 场景 A: 单周单时段单分组
pub fn scenario_a() -> GridBuilder {
    GridBuilder::new()
        .text(0, 0, "S1")
        .text(1, 2, "05/01/2026")
        .text(2, 2, "G 1")
        .text(3, 0, "H1")
        .text(3, 2, "Math")
        .text(5, 2, "Dupont")
        .text(7, 2, "08:00")
        .text(8, 2, "10:00")
}

/// 场景 B: 在 A 基础上第 3 列为相同课程的另一分组
pub fn scenario_b() -> GridBuilder {
    scenario_a()
        .text(2, 3, "G 2")
        .text(3, 3, "Math")
        .text(5, 3, "Dupont")
        .text(7, 3, "08:00")
        .text(8, 3, "10:00")
}

/// 场景 C: 第 3 列标题为空,两列分组不同
pub fn scenario_c() -> GridBuilder {
    scenario_a().text(2, 3, "G 2")
}

/// 在临时目录写入 CSV 文件
pub fn write_csv(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

/// 去掉每次运行都会变化的 UID / DTSTAMP 行
pub fn stable_lines(ics: &str) -> Vec<String> {
    ics.lines()
        .filter(|l| !l.starts_with("UID:") && !l.starts_with("DTSTAMP:"))
        .map(str::to_string)
        .collect()
}
