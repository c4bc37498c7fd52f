//! # Resource Source 模块
//!
//! 资源来源抽象层，支持从文件系统或 ZIP 包读取资源字节。
//!
//! 所有路径参数都是逻辑路径（见 [`super::path`]），
//! 由具体实现决定如何映射到实际位置。

use super::path::normalize_logical_path;
use fsn_core::ResourceError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// 资源来源 trait
///
/// - `FsSource`：从文件系统读取（开发模式）
/// - `ZipSource`：从 ZIP 包读取（发布模式）
pub trait ResourceSource: Send + Sync {
    /// 读取资源字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 检查资源是否存在
    fn exists(&self, path: &str) -> bool;

    /// 获取资源的完整路径（用于调试/日志）
    fn full_path(&self, path: &str) -> String;

    /// 查找并读取资源
    ///
    /// 资源不存在时返回 `Ok(None)`；来源本身不可用（如 ZIP 损坏）时返回 `Err`。
    fn lookup(&self, path: &str) -> Result<Option<Vec<u8>>, ResourceError> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.read(path).map(Some)
    }

    /// 释放来源内部的缓存数据（由缓存的回收回调触发）
    fn release_unused(&self) {}
}

/// 文件系统资源来源
#[derive(Debug, Clone)]
pub struct FsSource {
    /// 资源根目录
    base_path: PathBuf,
}

impl FsSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, logical_path: &str) -> PathBuf {
        self.base_path.join(normalize_logical_path(logical_path))
    }
}

impl ResourceSource for FsSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.resolve(path);

        std::fs::read(&full_path).map_err(|e| ResourceError::LoadFailed {
            path: full_path.to_string_lossy().to_string(),
            kind: "file".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn full_path(&self, path: &str) -> String {
        self.resolve(path).to_string_lossy().to_string()
    }
}

/// ZIP 文件资源来源
///
/// 首次访问时建立条目索引（逻辑路径 -> ZIP 内索引），
/// `release_unused` 会丢弃索引，下次访问时重建。
pub struct ZipSource {
    zip_path: PathBuf,
    index_cache: Mutex<Option<HashMap<String, usize>>>,
}

impl ZipSource {
    pub fn new(zip_path: impl Into<PathBuf>) -> Self {
        Self {
            zip_path: zip_path.into(),
            index_cache: Mutex::new(None),
        }
    }

    fn open_archive(&self) -> Result<zip::ZipArchive<File>, ResourceError> {
        let display = self.zip_path.to_string_lossy().to_string();

        let file = File::open(&self.zip_path).map_err(|e| ResourceError::LoadFailed {
            path: display.clone(),
            kind: "zip".to_string(),
            message: format!("无法打开 ZIP 文件: {}", e),
        })?;

        zip::ZipArchive::new(file).map_err(|e| ResourceError::LoadFailed {
            path: display,
            kind: "zip".to_string(),
            message: format!("无法读取 ZIP 文件: {}", e),
        })
    }

    fn build_index(&self) -> Result<HashMap<String, usize>, ResourceError> {
        let mut archive = self.open_archive()?;

        let mut index = HashMap::new();
        for i in 0..archive.len() {
            if let Ok(entry) = archive.by_index(i)
                && !entry.is_dir()
            {
                index.insert(normalize_logical_path(entry.name()), i);
            }
        }

        debug!(zip = %self.zip_path.display(), entries = index.len(), "ZIP 索引已建立");
        Ok(index)
    }

    /// 在索引中查找条目，必要时先建立索引
    fn entry_index(&self, logical_path: &str) -> Result<Option<usize>, ResourceError> {
        let mut cache = self.index_guard();

        if cache.is_none() {
            *cache = Some(self.build_index()?);
        }

        Ok(cache
            .as_ref()
            .and_then(|index| index.get(logical_path).copied()))
    }

    fn read_entry(&self, file_index: usize, logical_path: &str) -> Result<Vec<u8>, ResourceError> {
        let mut archive = self.open_archive()?;
        let mut entry = archive
            .by_index(file_index)
            .map_err(|e| ResourceError::LoadFailed {
                path: self.full_path(logical_path),
                kind: "zip_entry".to_string(),
                message: format!("无法读取 ZIP 条目: {}", e),
            })?;

        let mut buffer = Vec::new();
        entry
            .read_to_end(&mut buffer)
            .map_err(|e| ResourceError::LoadFailed {
                path: self.full_path(logical_path),
                kind: "zip_read".to_string(),
                message: format!("读取 ZIP 条目失败: {}", e),
            })?;

        Ok(buffer)
    }

    fn index_guard(&self) -> MutexGuard<'_, Option<HashMap<String, usize>>> {
        self.index_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 索引是否已建立
    pub fn is_indexed(&self) -> bool {
        self.index_guard().is_some()
    }
}

impl ResourceSource for ZipSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let logical = normalize_logical_path(path);

        let file_index = self
            .entry_index(&logical)?
            .ok_or_else(|| ResourceError::LoadFailed {
                path: self.full_path(&logical),
                kind: "zip_entry".to_string(),
                message: "条目不存在".to_string(),
            })?;

        self.read_entry(file_index, &logical)
    }

    fn lookup(&self, path: &str) -> Result<Option<Vec<u8>>, ResourceError> {
        let logical = normalize_logical_path(path);
        match self.entry_index(&logical)? {
            Some(file_index) => self.read_entry(file_index, &logical).map(Some),
            None => Ok(None),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.entry_index(&normalize_logical_path(path))
            .map(|index| index.is_some())
            .unwrap_or(false)
    }

    fn full_path(&self, path: &str) -> String {
        format!(
            "zip://{}#{}",
            self.zip_path.display(),
            normalize_logical_path(path)
        )
    }

    fn release_unused(&self) {
        *self.index_guard() = None;
    }
}
