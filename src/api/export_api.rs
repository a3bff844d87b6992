// ==========================================
// 课表日历导出系统 - 导出 API
// ==========================================
// 职责: 文件 → 工作表 → 课程 → iCalendar 文本
// 并发: 工作表之间互不依赖,每个工作表一个阻塞任务
// ==========================================

use crate::api::error::ApiResult;
use crate::config::error::ConfigError;
use crate::config::export_config::ExportConfig;
use crate::domain::grid::Grid;
use crate::engine::orchestrator::TimetableOrchestrator;
use crate::export::ics_writer::CalendarSerializer;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::file_parser_trait::SheetGrid;
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// 单个工作表的导出结果
#[derive(Debug, Clone, Serialize)]
pub struct SheetExport {
    pub sheet_name: String,
    pub event_count: usize,
    /// 无所属周标记而跳过的时段行数
    pub skipped_slots: usize,
    #[serde(skip_serializing)]
    pub ics: String,
}

/// 导出汇总（--summary-json 输出）
#[derive(Debug, Serialize)]
pub struct ExportSummary<'a> {
    pub source: String,
    pub timezone: &'a str,
    pub total_events: usize,
    pub sheets: &'a [SheetExport],
}

impl<'a> ExportSummary<'a> {
    pub fn new(source: &Path, timezone: &'a str, sheets: &'a [SheetExport]) -> Self {
        Self {
            source: source.display().to_string(),
            timezone,
            total_events: sheets.iter().map(|s| s.event_count).sum(),
            sheets,
        }
    }
}

/// 导出API
pub struct ExportApi {
    config: Arc<ExportConfig>,
}

impl ExportApi {
    /// 创建新的ExportApi实例（配置在此校验）
    pub fn new(config: ExportConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// 导出单个网格（同步）
    ///
    /// 网格内容不会导致失败;零事件只记录告警
    pub fn export_grid(&self, sheet_name: &str, grid: &Grid) -> ApiResult<SheetExport> {
        export_sheet(&self.config, sheet_name, grid)
    }

    /// 列出文件中的工作表
    pub async fn list_sheets<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<Vec<String>> {
        let path = file_path.as_ref().to_path_buf();
        let names = tokio::task::spawn_blocking(move || UniversalFileParser.sheet_names(&path))
            .await??;
        Ok(names)
    }

    /// 导出文件中已选择的全部工作表
    ///
    /// # 返回
    /// - Ok(Vec<SheetExport>): 按工作表在文件中的顺序排列
    /// - Err(ApiError): 文件不可读 / 格式不支持 / 指定工作表不存在
    pub async fn export_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<Vec<SheetExport>> {
        let path: PathBuf = file_path.as_ref().to_path_buf();
        let selected = self.config.sheets.clone();

        let sheets: Vec<SheetGrid> = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || UniversalFileParser.parse(&path, &selected))
                .await??
        };

        info!(file = %path.display(), sheets = sheets.len(), "开始导出工作表");

        let tasks = sheets.into_iter().map(|sheet| {
            let config = Arc::clone(&self.config);
            tokio::task::spawn_blocking(move || export_sheet(&config, &sheet.name, &sheet.grid))
        });

        let mut exports = Vec::new();
        for joined in join_all(tasks).await {
            exports.push(joined??);
        }
        Ok(exports)
    }
}

// 单个工作表: 提取 → 序列化
fn export_sheet(config: &ExportConfig, sheet_name: &str, grid: &Grid) -> ApiResult<SheetExport> {
    let orchestrator =
        TimetableOrchestrator::new(&config.layout).map_err(|e| ConfigError::InvalidPattern {
            pattern: "layout".to_string(),
            message: e.to_string(),
        })?;
    let serializer = CalendarSerializer::new(config)?;

    let extraction = orchestrator.run(grid);
    let ics = serializer.render(&extraction.sessions);
    let event_count = extraction.sessions.len();

    if event_count == 0 {
        warn!(sheet = sheet_name, "工作表未提取到任何课程");
    } else {
        info!(sheet = sheet_name, events = event_count, "工作表导出完成");
    }

    Ok(SheetExport {
        sheet_name: sheet_name.to_string(),
        event_count,
        skipped_slots: extraction.skipped_slots,
        ics,
    })
}
