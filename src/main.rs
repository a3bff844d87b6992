// ==========================================
// 课表日历导出系统 - 命令行入口
// ==========================================
// 用法:
//   timetable-ics edt.xlsx -o out/
//   timetable-ics edt.xlsx --sheet "EDT P1" --tz Europe/Paris
//   timetable-ics edt.xlsx --list
// 每个工作表输出一个 <工作表名>.ics
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use timetable_ics::{logging, ExportApi, ExportConfig, ExportSummary};
use tracing::info;

/// 课表网格导出为 iCalendar
#[derive(Parser, Debug)]
#[command(name = "timetable-ics")]
#[command(version, about, long_about = None)]
struct Args {
    /// 输入文件（.xlsx/.xlsm/.xls/.ods/.csv）
    input: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// 待导出的工作表（可重复;默认全部）
    #[arg(short, long = "sheet")]
    sheets: Vec<String>,

    /// 目标时区（IANA 标识）
    #[arg(long)]
    tz: Option<String>,

    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 不输出 VTIMEZONE 组件
    #[arg(long)]
    no_vtimezone: bool,

    /// 列出工作表后退出
    #[arg(long)]
    list: bool,

    /// 在标准输出打印 JSON 汇总
    #[arg(long)]
    summary_json: bool,
}

impl Args {
    // 配置优先级: 命令行 > 配置文件 > 默认值
    fn export_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_json_file(path)
                .with_context(|| format!("加载配置失败: {}", path.display()))?,
            None => ExportConfig::default(),
        };
        if let Some(tz) = &self.tz {
            config.timezone = tz.clone();
        }
        if !self.sheets.is_empty() {
            config.sheets = self.sheets.clone();
        }
        if self.no_vtimezone {
            config.include_vtimezone = false;
        }
        Ok(config)
    }
}

/// 工作表名 → 文件名（替换路径分隔符等非法字符）
fn output_file_name(sheet_name: &str) -> String {
    let cleaned: String = sheet_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "sheet.ics".to_string()
    } else {
        format!("{}.ics", cleaned)
    }
}

fn write_output(dir: &Path, sheet_name: &str, ics: &str) -> Result<PathBuf> {
    let path = dir.join(output_file_name(sheet_name));
    fs::write(&path, ics).with_context(|| format!("写入失败: {}", path.display()))?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = Args::parse();
    let api = ExportApi::new(args.export_config()?)?;

    if args.list {
        for name in api.list_sheets(&args.input).await? {
            println!("{}", name);
        }
        return Ok(());
    }

    info!(
        "{} v{} - 时区 {}",
        timetable_ics::APP_NAME,
        timetable_ics::VERSION,
        api.config().timezone
    );

    let exports = api
        .export_file(&args.input)
        .await
        .with_context(|| format!("导出失败: {}", args.input.display()))?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("创建输出目录失败: {}", args.output_dir.display()))?;

    for export in &exports {
        let path = write_output(&args.output_dir, &export.sheet_name, &export.ics)?;
        info!(
            sheet = %export.sheet_name,
            events = export.event_count,
            path = %path.display(),
            "已写入"
        );
    }

    if args.summary_json {
        let summary = ExportSummary::new(&args.input, &api.config().timezone, &exports);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("EDT P1"), "EDT P1.ics");
        assert_eq!(output_file_name("S1/S2"), "S1_S2.ics");
        assert_eq!(output_file_name("  "), "sheet.ics");
        assert_eq!(output_file_name(".."), "sheet.ics");
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "timetable-ics",
            "edt.xlsx",
            "--sheet",
            "EDT P1",
            "--sheet",
            "EDT P2",
            "--tz",
            "UTC",
            "--no-vtimezone",
        ]);
        let config = args.export_config().unwrap();
        assert_eq!(config.sheets, vec!["EDT P1", "EDT P2"]);
        assert_eq!(config.timezone, "UTC");
        assert!(!config.include_vtimezone);
    }
}
