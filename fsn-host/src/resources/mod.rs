//! # Resources 模块
//!
//! 把 `fsn-core` 的资源缓存接到实际的资源来源上：
//!
//! - [`SourceStore`]：以 [`ResourceSource`] 作为缓存的默认资源库
//! - 内置资源类型：[`TextAsset`]、[`RawAsset`]、[`Texture`]
//! - [`create_cache`]：按配置创建缓存

pub mod path;
mod source;

pub use source::{FsSource, ResourceSource, ZipSource};

use crate::config::{AppConfig, AssetSourceType, ConfigError};
use fsn_core::{Category, Resource, ResourceCache, ResourceError, ResourceResult, ResourceStore};
use path::normalize_logical_path;
use std::sync::Arc;
use tracing::info;

/// 以资源来源作为默认资源库
///
/// 名称先规范化为逻辑路径；来源中不存在时返回 `None`。
#[derive(Clone)]
pub struct SourceStore {
    source: Arc<dyn ResourceSource>,
}

impl SourceStore {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self { source }
    }
}

impl ResourceStore for SourceStore {
    fn lookup(&self, name: &str) -> Result<Option<Vec<u8>>, ResourceError> {
        self.source.lookup(&normalize_logical_path(name))
    }
}

/// 以逻辑路径为缓存键加载资源
///
/// `ResourceCache` 按原样使用名称作为键，`./bg/a.png` 和 `bg/a.png` 会被当成两个资源。
/// 宿主侧的加载都应经过这里。
pub fn load_asset<T: Resource>(
    cache: &mut ResourceCache,
    category: Category,
    name: &str,
) -> ResourceResult<Arc<T>> {
    cache.load::<T>(category, &normalize_logical_path(name))
}

/// UTF-8 文本资源（脚本、配置片段等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAsset(pub String);

impl Resource for TextAsset {
    fn decode(name: &str, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        String::from_utf8(bytes)
            .map(TextAsset)
            .map_err(|e| ResourceError::Undecodable {
                name: name.to_string(),
                kind: "text",
                message: e.to_string(),
            })
    }
}

/// 原始字节资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset(pub Vec<u8>);

impl Resource for RawAsset {
    fn decode(_name: &str, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        Ok(RawAsset(bytes))
    }
}

/// 解码后的 RGBA8 纹理
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// 行优先的 RGBA8 像素
    pub pixels: Vec<u8>,
}

impl Texture {
    /// 估算的显存占用（字节）
    pub fn size_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl Resource for Texture {
    fn decode(name: &str, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        let img = image::load_from_memory(&bytes).map_err(|e| ResourceError::Undecodable {
            name: name.to_string(),
            kind: "texture",
            message: e.to_string(),
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Texture {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// 按扩展名推断的内置资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Text,
    Raw,
}

impl AssetKind {
    pub fn from_name(name: &str) -> Self {
        match path::extension(&normalize_logical_path(name)).as_deref() {
            Some("png" | "jpg" | "jpeg" | "webp") => AssetKind::Texture,
            Some("txt" | "md" | "json" | "fsn") => AssetKind::Text,
            _ => AssetKind::Raw,
        }
    }

    /// 以推断出的类型加载到缓存（名称先规范化）
    pub fn load(self, cache: &mut ResourceCache, category: Category, name: &str) -> ResourceResult<()> {
        match self {
            AssetKind::Texture => load_asset::<Texture>(cache, category, name).map(drop),
            AssetKind::Text => load_asset::<TextAsset>(cache, category, name).map(drop),
            AssetKind::Raw => load_asset::<RawAsset>(cache, category, name).map(drop),
        }
    }
}

/// 按配置创建资源来源
pub fn create_source(config: &AppConfig) -> Result<Arc<dyn ResourceSource>, ConfigError> {
    match config.asset_source {
        AssetSourceType::Fs => {
            info!(assets_root = %config.assets_root.display(), "资源来源: 文件系统");
            Ok(Arc::new(FsSource::new(&config.assets_root)))
        }
        AssetSourceType::Zip => {
            let zip_path = config.zip_path.as_ref().ok_or_else(|| {
                ConfigError::ValidationFailed("Zip 模式必须配置 zip_path".to_string())
            })?;
            info!(zip_path = %zip_path, "资源来源: ZIP 文件");
            Ok(Arc::new(ZipSource::new(zip_path)))
        }
    }
}

/// 按配置创建资源缓存
///
/// 开启 `reclaim_after_session` 时，缓存的回收回调会让来源释放内部缓存。
pub fn create_cache(config: &AppConfig) -> Result<(ResourceCache, Arc<dyn ResourceSource>), ConfigError> {
    let source = create_source(config)?;
    let mut cache = ResourceCache::new(SourceStore::new(source.clone()));

    if config.resources.reclaim_after_session {
        let reclaim_source = source.clone();
        cache.set_reclaim_hook(move || reclaim_source.release_unused());
    }

    Ok((cache, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_from_name() {
        assert_eq!(AssetKind::from_name("bg/room.PNG"), AssetKind::Texture);
        assert_eq!(AssetKind::from_name("scripts/intro.fsn"), AssetKind::Text);
        assert_eq!(AssetKind::from_name("audio/bgm.ogg"), AssetKind::Raw);
        assert_eq!(AssetKind::from_name("noext"), AssetKind::Raw);
    }

    #[test]
    fn test_text_asset_rejects_invalid_utf8() {
        let err = TextAsset::decode("bad.txt", vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ResourceError::Undecodable { kind: "text", .. }));
    }

    #[test]
    fn test_texture_rejects_garbage() {
        let err = Texture::decode("bad.png", b"not an image".to_vec()).unwrap_err();
        assert!(matches!(err, ResourceError::Undecodable { kind: "texture", .. }));
    }

    #[test]
    fn test_source_store_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "A").unwrap();

        let store = SourceStore::new(Arc::new(FsSource::new(dir.path())));
        assert_eq!(store.lookup("assets/a.txt").unwrap(), Some(b"A".to_vec()));
        assert_eq!(store.lookup("b.txt").unwrap(), None);
    }

    #[test]
    fn test_source_store_propagates_broken_zip() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("game.zip");
        std::fs::write(&zip_path, b"this is not a zip archive").unwrap();

        let mut cache = ResourceCache::new(SourceStore::new(Arc::new(ZipSource::new(&zip_path))));
        let err = cache
            .load::<TextAsset>(Category::Script, "scripts/a.txt")
            .unwrap_err();
        assert!(matches!(err, ResourceError::LoadFailed { .. }));
    }

    #[test]
    fn test_load_asset_normalizes_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("scripts")).unwrap();
        std::fs::write(dir.path().join("scripts/intro.txt"), "第一章").unwrap();

        let mut cache = ResourceCache::new(SourceStore::new(Arc::new(FsSource::new(dir.path()))));
        let first = load_asset::<TextAsset>(&mut cache, Category::Script, "scripts/intro.txt").unwrap();
        let second =
            load_asset::<TextAsset>(&mut cache, Category::Script, "./assets/scripts/intro.txt").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.names(Category::Script), vec!["scripts/intro.txt"]);
        assert_eq!(cache.stats().misses, 1);
    }
}
