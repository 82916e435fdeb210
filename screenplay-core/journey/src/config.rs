//! Screenplay 配置管理
//!
//! 支持从多个源加载配置:
//! - 环境变量 (优先级最高)
//! - 配置文件 (TOML/YAML/JSON)
//! - 默认值 (优先级最低)
//!
//! 配置文件搜索路径 (按优先级):
//! 1. `SCREENPLAY_CONFIG` 环境变量指定的路径
//! 2. `./screenplay.toml` / `./screenplay.yaml` / `./screenplay.json` (当前目录)
//! 3. `./tests/screenplay.toml` (tests 目录)
//! 4. `~/.config/screenplay/config.toml` (用户配置目录)
//! 5. `/etc/screenplay/config.toml` (系统配置目录)

use anyhow::{Context, Result};
use screenplay_locators::PageTimeouts;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::FailFastPolicy;

/// 配置 (顶层)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenplayConfig {
    /// 环境配置
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// 表演行为配置
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// 页面超时配置
    #[serde(default)]
    pub pages: PageTimeouts,

    /// 报告配置
    #[serde(default)]
    pub report: ReportConfig,
}

/// 环境配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 表演行为配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// 致命错误时立即中止剩余任务
    #[serde(default)]
    pub fail_fast: bool,
}

/// 报告配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 输出格式
    #[serde(default)]
    pub format: ReportFormat,

    /// 报告输出目录 (未设置时输出到终端)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

/// 报告输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => anyhow::bail!("Unsupported report format: {}", other),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            output_dir: None,
        }
    }
}

impl ScreenplayConfig {
    /// 从多个源加载配置 (优先级: 环境变量 > 配置文件 > 默认值)
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                tracing::debug!("Loading config from: {:?}", path);
                Self::load_from_file(&path)?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_vars()?;

        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = match extension(path) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {:?}", path))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {:?}", path))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {:?}", path))?,
            _ => anyhow::bail!("Unsupported config file format: {:?}", path),
        };

        Ok(config)
    }

    /// 从指定路径字符串加载配置
    pub fn load_from_path(path: &str) -> Result<Self> {
        Self::load_from_file(Path::new(path))
    }

    /// 查找配置文件 (按优先级搜索)
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("SCREENPLAY_CONFIG") {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        let mut candidates = vec![
            PathBuf::from("./screenplay.toml"),
            PathBuf::from("./screenplay.yaml"),
            PathBuf::from("./screenplay.json"),
            PathBuf::from("./tests/screenplay.toml"),
        ];

        if let Some(config_dir) = dirs::home_dir().map(|home| home.join(".config/screenplay")) {
            candidates.push(config_dir.join("config.toml"));
            candidates.push(config_dir.join("config.yaml"));
        }

        #[cfg(target_os = "linux")]
        candidates.push(PathBuf::from("/etc/screenplay/config.toml"));

        candidates.into_iter().find(|path| path.exists())
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// 按变量名查询覆盖值
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SCREENPLAY_LOG_LEVEL") {
            self.environment.log_level = level;
        }

        if let Some(fail_fast) = lookup("SCREENPLAY_FAIL_FAST") {
            self.performance.fail_fast = parse_bool(&fail_fast)
                .with_context(|| format!("Invalid SCREENPLAY_FAIL_FAST value: {}", fail_fast))?;
        }

        if let Some(wait) = lookup("SCREENPLAY_IMPLICIT_WAIT_MS") {
            self.pages.implicit_wait_ms = wait
                .parse()
                .context("Invalid SCREENPLAY_IMPLICIT_WAIT_MS value")?;
        }
        if let Some(wait) = lookup("SCREENPLAY_WAIT_FOR_TIMEOUT_MS") {
            self.pages.wait_for_timeout_ms = wait
                .parse()
                .context("Invalid SCREENPLAY_WAIT_FOR_TIMEOUT_MS value")?;
        }

        if let Some(format) = lookup("SCREENPLAY_REPORT_FORMAT") {
            self.report.format = format.parse()?;
        }

        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let level = self.environment.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.environment.log_level);
        }

        if self.pages.implicit_wait_ms == 0 {
            anyhow::bail!("pages.implicit_wait_ms must be greater than 0");
        }
        if self.pages.wait_for_timeout_ms < self.pages.implicit_wait_ms {
            anyhow::bail!(
                "pages.wait_for_timeout_ms ({}) must not be less than pages.implicit_wait_ms ({})",
                self.pages.wait_for_timeout_ms,
                self.pages.implicit_wait_ms
            );
        }

        if let Some(dir) = &self.report.output_dir {
            if dir.trim().is_empty() {
                anyhow::bail!("report.output_dir cannot be empty");
            }
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let content = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).context("Failed to serialize to TOML")?,
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(self).context("Failed to serialize to YAML")?
            }
            Some("json") => {
                serde_json::to_string_pretty(self).context("Failed to serialize to JSON")?
            }
            _ => anyhow::bail!("Unsupported config file format: {:?}", path),
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// 将 fail-fast 设置写入策略
    pub fn apply_to(&self, policy: &FailFastPolicy) {
        policy.set(self.performance.fail_fast);
    }

    pub fn page_timeouts(&self) -> PageTimeouts {
        self.pages
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScreenplayConfig::default();
        assert_eq!(config.environment.log_level, "info");
        assert!(!config.performance.fail_fast);
        assert_eq!(config.pages.implicit_wait_ms, 2000);
        assert_eq!(config.pages.wait_for_timeout_ms, 5000);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScreenplayConfig = toml::from_str(
            r#"
            [performance]
            fail_fast = true

            [pages]
            implicit_wait_ms = 500
            "#,
        )
        .unwrap();

        assert!(config.performance.fail_fast);
        assert_eq!(config.pages.implicit_wait_ms, 500);
        assert_eq!(config.pages.wait_for_timeout_ms, 5000);
        assert_eq!(config.environment.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let mut config = ScreenplayConfig::default();
        config
            .apply_overrides(overrides(&[
                ("SCREENPLAY_FAIL_FAST", "yes"),
                ("SCREENPLAY_LOG_LEVEL", "debug"),
                ("SCREENPLAY_IMPLICIT_WAIT_MS", "100"),
                ("SCREENPLAY_WAIT_FOR_TIMEOUT_MS", "900"),
                ("SCREENPLAY_REPORT_FORMAT", "json"),
            ]))
            .unwrap();

        assert!(config.performance.fail_fast);
        assert_eq!(config.environment.log_level, "debug");
        assert_eq!(config.pages.implicit_wait_ms, 100);
        assert_eq!(config.pages.wait_for_timeout_ms, 900);
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_invalid_override() {
        let mut config = ScreenplayConfig::default();
        assert!(config
            .apply_overrides(overrides(&[("SCREENPLAY_FAIL_FAST", "maybe")]))
            .is_err());
        assert!(config
            .apply_overrides(overrides(&[("SCREENPLAY_IMPLICIT_WAIT_MS", "soon")]))
            .is_err());
        assert!(config
            .apply_overrides(overrides(&[("SCREENPLAY_REPORT_FORMAT", "html")]))
            .is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = ScreenplayConfig::default();
        config.environment.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = ScreenplayConfig::default();
        config.pages.wait_for_timeout_ms = 10;
        assert!(config.validate().is_err());

        let mut config = ScreenplayConfig::default();
        config.report.output_dir = Some(" ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_to_policy() {
        let policy = FailFastPolicy::default();
        let mut config = ScreenplayConfig::default();
        config.performance.fail_fast = true;
        config.apply_to(&policy);
        assert!(policy.should_throw_errors_immediately());
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("YAML".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert_eq!(ReportFormat::Json.to_string(), "json");
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
