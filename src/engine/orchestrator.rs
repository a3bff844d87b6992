// ==========================================
// 课表日历导出系统 - 引擎编排器
// ==========================================
// 用途: 协调单个工作表的提取流程
// 网格 → 分类 → 定位 → 时段提取 → 分组合并
// ==========================================
// 红线: 工作表级不部分失败,总是返回（可能为空的）课程列表
// 红线: 纯计算,无 I/O,无跨工作表状态
// ==========================================

use crate::config::layout::LayoutConfig;
use crate::domain::grid::Grid;
use crate::domain::session::{MergedSession, SessionCandidate};
use crate::engine::cell_classifier::ClassifiedGrid;
use crate::engine::grid_locator::GridLocator;
use crate::engine::group_merger::GroupMerger;
use crate::engine::slot_extractor::SlotExtractor;
use tracing::{debug, info};

// ==========================================
// ExtractionResult - 提取结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub sessions: Vec<MergedSession>,
    pub week_markers: usize,
    pub slot_markers: usize,
    /// 无所属周标记而跳过的时段行
    pub skipped_slots: usize,
    pub candidates: usize,
}

// ==========================================
// TimetableOrchestrator - 引擎编排器
// ==========================================
pub struct TimetableOrchestrator {
    locator: GridLocator,
    extractor: SlotExtractor,
}

impl TimetableOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - layout: 网格布局约定（标记正则在此编译）
    pub fn new(layout: &LayoutConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            locator: GridLocator::new(layout)?,
            extractor: SlotExtractor::new(layout),
        })
    }

    /// 执行完整提取流程（单个工作表）
    pub fn run(&self, grid: &Grid) -> ExtractionResult {
        let classified = ClassifiedGrid::new(grid);
        let markers = self.locator.locate(&classified);

        let mut candidates: Vec<SessionCandidate> = Vec::new();
        let mut skipped_slots = 0;

        for &slot_row in &markers.slot_rows {
            let Some(block) = self.locator.week_block(&classified, &markers, slot_row) else {
                skipped_slots += 1;
                continue;
            };
            let window = self.extractor.window(
                &classified,
                slot_row,
                markers.next_marker_after(slot_row),
            );
            let found = self.extractor.extract(&classified, &block, window);
            debug!(slot_row, candidates = found.len(), "时段提取完成");
            candidates.extend(found);
        }

        let candidate_count = candidates.len();
        let sessions = GroupMerger::merge(candidates);

        info!(
            weeks = markers.week_rows.len(),
            slots = markers.slot_rows.len(),
            skipped_slots,
            candidates = candidate_count,
            sessions = sessions.len(),
            "课表提取完成"
        );

        ExtractionResult {
            sessions,
            week_markers: markers.week_rows.len(),
            slot_markers: markers.slot_rows.len(),
            skipped_slots,
            candidates: candidate_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::CellValue;

    #[test]
    fn test_empty_grid_yields_no_sessions() {
        let orchestrator = TimetableOrchestrator::new(&LayoutConfig::default()).unwrap();
        let result = orchestrator.run(&Grid::default());
        assert!(result.sessions.is_empty());
        assert_eq!(result.slot_markers, 0);
    }

    #[test]
    fn test_orphan_slot_counted_as_skipped() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::text("H1"), CellValue::text("Math")],
            vec![CellValue::text("S1")],
        ]);
        let orchestrator = TimetableOrchestrator::new(&LayoutConfig::default()).unwrap();
        let result = orchestrator.run(&grid);
        assert_eq!(result.skipped_slots, 1);
        assert_eq!(result.week_markers, 1);
        assert!(result.sessions.is_empty());
    }
}
