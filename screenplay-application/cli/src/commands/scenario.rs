//! Scenario 命令处理

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use screenplay_journey::{ReportFormat, Scenario, ScenarioRunner, ScreenplayConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::output;

pub fn run(
    config: &ScreenplayConfig,
    file: &str,
    fail_fast: bool,
    format: Option<&str>,
    output_file: Option<&str>,
) -> Result<()> {
    let format = match format {
        Some(f) => f.parse::<ReportFormat>()?,
        None => config.report.format,
    };

    let scenario = load(file)?;
    scenario
        .validate()
        .with_context(|| format!("场景校验失败: {}", file))?;

    // 结构化输出时只打印报告本身
    let text = format == ReportFormat::Text;
    if text {
        println!(
            "{} 场景加载成功: {}",
            "✓".green().bold(),
            scenario.name.cyan()
        );
        if let Some(desc) = &scenario.description {
            println!("描述: {}", desc.bright_black());
        }
        println!("演员: {}", scenario.actor.yellow());
        println!("任务数: {}", scenario.task_count().to_string().yellow());
        if !scenario.tags.is_empty() {
            println!("标签: {}", scenario.tags.join(", ").bright_black());
        }
        println!();
    }

    let mut runner = ScenarioRunner::from_config(config);
    if fail_fast {
        runner = runner.with_fail_fast(true);
    }

    let spinner = ProgressBar::new_spinner();
    if text {
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        spinner.set_message("执行场景...");
        spinner.enable_steady_tick(Duration::from_millis(100));
    } else {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let report = runner.run(&scenario)?;
    spinner.finish_and_clear();

    output::print_report(&report, format)?;

    let destination = match output_file {
        Some(path) => Some(PathBuf::from(path)),
        None => config
            .report
            .output_dir
            .as_ref()
            .map(|dir| Path::new(dir).join(format!("{}.json", report_file_stem(&scenario.name)))),
    };
    if let Some(path) = destination {
        output::save_report(&report, &path)?;
        if text {
            println!("报告已保存: {}", path.display().to_string().cyan());
        }
    }

    if !report.passed {
        anyhow::bail!("场景未通过: {}", scenario.name);
    }

    Ok(())
}

pub fn validate(file: &str) -> Result<()> {
    let scenario = load(file)?;
    scenario
        .validate()
        .with_context(|| format!("场景校验失败: {}", file))?;

    println!(
        "{} {} ({} 个任务, {} 个结果检查)",
        "✓".green().bold(),
        scenario.name.cyan(),
        scenario.task_count(),
        scenario.consequences.len()
    );
    Ok(())
}

pub fn list(dir: &str) -> Result<()> {
    let dir_path = Path::new(dir);
    if !dir_path.exists() {
        println!("{}", format!("场景目录不存在: {}", dir).yellow());
        return Ok(());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir_path)
        .with_context(|| format!("读取场景目录失败: {}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml") | Some("json")
            )
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{}", "没有找到场景文件".yellow());
        return Ok(());
    }

    println!("{:<40} {:<30} {}", "文件", "场景", "任务数");
    println!("{}", "-".repeat(80));
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match Scenario::from_file(&path) {
            Ok(scenario) => println!(
                "{:<40} {:<30} {}",
                name,
                scenario.name.cyan(),
                scenario.task_count()
            ),
            Err(e) => println!("{:<40} {}", name, format!("无法解析: {}", e).red()),
        }
    }

    Ok(())
}

fn load(file: &str) -> Result<Scenario> {
    Scenario::from_file(file).with_context(|| format!("加载场景失败: {}", file))
}

fn report_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
