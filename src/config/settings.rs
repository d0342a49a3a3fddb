use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::config::DefaultConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 摘要计算配置
    pub digest: DigestSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    /// 并发摘要任务数，必须大于 0
    pub workers: usize,

    /// 是否递归进入子目录
    pub recursive: bool,

    /// 遍历器与工作池之间的路径队列容量
    pub queue_size: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            workers: DefaultConfig::default_workers(),
            recursive: false,
            queue_size: DefaultConfig::default_queue_size(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push(DefaultConfig::app_dir_name());
        path.push("config.toml");
        Ok(path)
    }

    /// 加载默认路径下的配置，文件不存在时使用内置默认值
    pub fn load_or_default() -> Result<Self> {
        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 检查配置取值
    pub fn validate(&self) -> Result<()> {
        if self.digest.workers == 0 {
            anyhow::bail!("digest.workers 必须大于 0");
        }
        Ok(())
    }
}
