//! # Config 模块
//!
//! 宿主配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use fsn_core::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 资源来源类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetSourceType {
    /// 文件系统（开发模式）
    #[default]
    Fs,
    /// ZIP 文件（发布模式）
    Zip,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录（仅 Fs 模式使用）
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 资源来源类型（fs/zip）
    #[serde(default)]
    pub asset_source: AssetSourceType,

    /// ZIP 文件路径（仅 Zip 模式使用）
    #[serde(default)]
    pub zip_path: Option<String>,

    /// 资源缓存配置
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// 资源缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// 每个分类启动时预加载的资源（逻辑路径）
    #[serde(default)]
    pub preload: BTreeMap<Category, Vec<String>>,

    /// 会话结束/分类卸载后是否让资源来源释放内部缓存
    #[serde(default = "default_reclaim_after_session")]
    pub reclaim_after_session: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            preload: BTreeMap::new(),
            reclaim_after_session: default_reclaim_after_session(),
        }
    }
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_reclaim_after_session() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            asset_source: AssetSourceType::default(),
            zip_path: None,
            resources: ResourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.asset_source {
            AssetSourceType::Fs => {
                if !self.assets_root.is_dir() {
                    return Err(ConfigError::ValidationFailed(format!(
                        "资源目录不存在: {:?}",
                        self.assets_root
                    )));
                }
            }
            AssetSourceType::Zip => {
                let zip_path = self.zip_path.as_ref().ok_or_else(|| {
                    ConfigError::ValidationFailed("Zip 模式必须配置 zip_path".to_string())
                })?;

                if !Path::new(zip_path).is_file() {
                    return Err(ConfigError::ValidationFailed(format!(
                        "ZIP 文件不存在: {}",
                        zip_path
                    )));
                }
            }
        }

        for (category, names) in &self.resources.preload {
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(ConfigError::ValidationFailed(format!(
                    "预加载列表 [{}] 中有空的资源名",
                    category
                )));
            }
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.assets_root, PathBuf::from("assets"));
        assert_eq!(config.asset_source, AssetSourceType::Fs);
        assert!(config.resources.reclaim_after_session);
        assert!(config.resources.preload.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "asset_source": "zip",
            "zip_path": "game.zip",
            "resources": { "preload": { "engine": ["fonts/ui.ttf"], "script": [] } }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.asset_source, AssetSourceType::Zip);
        assert_eq!(config.assets_root, PathBuf::from("assets"));
        assert!(config.resources.reclaim_after_session);
        assert_eq!(
            config.resources.preload.get(&Category::Engine),
            Some(&vec!["fonts/ui.ttf".to_string()])
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.resources.reclaim_after_session = false;
        config
            .resources
            .preload
            .insert(Category::Ui, vec!["ui/button.png".to_string()]);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert!(!loaded.resources.reclaim_after_session);
        assert_eq!(loaded.resources.preload.len(), 1);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = AppConfig::load("definitely/not/here.json");
        assert_eq!(config.assets_root, PathBuf::from("assets"));
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig {
            assets_root: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());

        config
            .resources
            .preload
            .insert(Category::Script, vec!["  ".to_string()]);
        assert!(config.validate().is_err());

        let config = AppConfig {
            asset_source: AssetSourceType::Zip,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }
}
