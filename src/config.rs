/// 应用配置管理
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_STORAGE_KEY;

const APP_DIR: &str = "study-tracker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录（为空时使用系统默认数据目录）
    pub data_dir: Option<PathBuf>,
    /// 持久化槽位名称
    pub storage_key: String,
    /// 删除任务前是否需要确认
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            confirm_delete: true,
        }
    }
}

/// 获取配置文件路径
/// Windows: %APPDATA%\study-tracker\config.toml
/// macOS: ~/Library/Application Support/study-tracker/config.toml
/// Linux: ~/.config/study-tracker/config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;
    Ok(config_dir.join(APP_DIR).join("config.toml"))
}

/// 加载配置，文件不存在时返回默认配置
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed parsing {}", path.display()))?;

    Ok(config)
}

/// 保存配置
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// 解析数据目录：命令行 > 配置文件 > 系统数据目录
pub fn resolve_data_dir(config: &Config, cli_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = cli_override {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    let base = dirs::data_dir().context("failed to determine data directory")?;
    Ok(base.join(APP_DIR))
}

/// 显示当前配置
pub fn show_config(config: &Config, config_path: &Path, data_dir: &Path) {
    println!("Current configuration:");
    println!("  data dir:        {}", data_dir.display());
    println!("  storage key:     {}", config.storage_key);
    println!("  confirm delete:  {}", config.confirm_delete);
    println!();
    println!("Config file: {}", config_path.display());
}
