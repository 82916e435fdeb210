//! 执行报告输出

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use screenplay_journey::{ExecutionReport, ReportFormat};
use screenplay_reporting::{StepStatus, TestStep};
use std::fs;
use std::path::Path;

/// 按格式输出报告
pub fn print_report(report: &ExecutionReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => print_text(report),
        ReportFormat::Json => println!("{}", report.to_json()?),
        ReportFormat::Yaml => println!("{}", report.to_yaml()?),
    }
    Ok(())
}

/// 保存报告，格式由扩展名决定
pub fn save_report(report: &ExecutionReport, path: &Path) -> Result<()> {
    let content = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => report.to_json()?,
        Some("yaml") | Some("yml") => report.to_yaml()?,
        _ => anyhow::bail!("不支持的报告格式，仅支持 .json 或 .yaml/.yml: {}", path.display()),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建目录失败: {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("写入报告失败: {}", path.display()))?;

    Ok(())
}

fn print_text(report: &ExecutionReport) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "执行报告".bold());
    println!("{}", "=".repeat(60));
    println!();

    println!("场景名称: {}", report.scenario_name.cyan().bold());
    if let Some(desc) = &report.description {
        println!("场景描述: {}", desc.bright_black());
    }
    println!("演员:     {}", report.actor);
    println!("执行时间: {} ms", report.duration_ms.to_string().yellow());
    println!();

    let summary = &report.summary;
    println!("步骤统计:");
    println!("  总步骤: {}", summary.total.to_string().bright_blue());
    println!("  成功:   {}", summary.passed.to_string().green());
    println!("  失败:   {}", summary.failed.to_string().red());
    println!("  忽略:   {}", summary.ignored.to_string().bright_black());
    println!("  待实现: {}", summary.pending.to_string().yellow());
    println!("  已尝试任务: {}", report.tasks_attempted);
    println!();

    if !report.outcome.steps.is_empty() {
        println!("步骤详情:");
        println!();
        for step in &report.outcome.steps {
            print_step(step, 1);
        }
        println!();
    }

    if let Some(error) = &report.escaped_error {
        println!("{} {}", "执行中止:".red().bold(), error);
        println!();
    }

    println!("{}", "=".repeat(60));
    if report.passed {
        println!("{} {}", "✓".green().bold(), "场景通过".green().bold());
    } else {
        println!("{} {}", "✗".red().bold(), "场景失败".red().bold());
    }
    println!("{}", "=".repeat(60));
}

fn print_step(step: &TestStep, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{} {} ({} ms)",
        indent,
        status_icon(step.status),
        step.description,
        step.duration_ms
    );
    if let Some(error) = &step.error {
        println!("{}    {}", indent, error.red());
    }
    for child in &step.children {
        print_step(child, depth + 1);
    }
}

fn status_icon(status: StepStatus) -> ColoredString {
    match status {
        StepStatus::Success => "✓".green(),
        StepStatus::Ignored => "-".bright_black(),
        StepStatus::Skipped => "»".bright_black(),
        StepStatus::Pending => "…".yellow(),
        StepStatus::Failed => "✗".red(),
    }
}
