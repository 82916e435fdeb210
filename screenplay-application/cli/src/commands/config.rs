//! Config 命令处理

use anyhow::{Context, Result};
use colored::Colorize;
use screenplay_journey::ScreenplayConfig;
use std::path::Path;

pub fn handle(config: &ScreenplayConfig, action: crate::ConfigAction) -> Result<()> {
    match action {
        crate::ConfigAction::Show => show(config),
        crate::ConfigAction::Init { path, force } => init(Path::new(&path), force),
    }
}

fn show(config: &ScreenplayConfig) -> Result<()> {
    config.validate().context("当前配置无效")?;
    let content = toml::to_string_pretty(config).context("序列化配置失败")?;
    println!("{}", content);
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("配置文件已存在: {} (使用 --force 覆盖)", path.display());
    }

    ScreenplayConfig::default().save_to_file(path)?;
    println!(
        "{} 已生成配置文件: {}",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}
