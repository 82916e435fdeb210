//! Screenplay CLI 应用

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screenplay_journey::ScreenplayConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "screenplay")]
#[command(about = "Screenplay - 演员/任务式自动化测试执行器", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别 (默认取配置文件中的 environment.log_level)
    #[arg(short, long)]
    log_level: Option<String>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行场景
    Run {
        /// 场景文件路径 (.yaml/.yml/.json)
        file: String,

        /// 致命错误时立即中止
        #[arg(long)]
        fail_fast: bool,

        /// 输出格式 (text, json, yaml)
        #[arg(short, long)]
        format: Option<String>,

        /// 报告输出文件 (.json/.yaml)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 校验场景文件
    Validate {
        /// 场景文件路径
        file: String,
    },

    /// 列出目录中的场景
    List {
        /// 场景目录
        #[arg(default_value = "./scenarios")]
        dir: String,
    },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示生效的配置
    Show,

    /// 生成默认配置文件
    Init {
        /// 配置文件路径
        #[arg(default_value = "./screenplay.toml")]
        path: String,

        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScreenplayConfig::load_from_path(path)
            .with_context(|| format!("加载配置文件失败: {}", path))?,
        None => ScreenplayConfig::load()?,
    };

    // 初始化日志 (RUST_LOG 优先)
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.environment.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Screenplay CLI 启动");

    match cli.command {
        Commands::Run {
            file,
            fail_fast,
            format,
            output,
        } => commands::scenario::run(&config, &file, fail_fast, format.as_deref(), output.as_deref())?,
        Commands::Validate { file } => commands::scenario::validate(&file)?,
        Commands::List { dir } => commands::scenario::list(&dir)?,
        Commands::Config { action } => commands::config::handle(&config, action)?,
    }

    Ok(())
}
