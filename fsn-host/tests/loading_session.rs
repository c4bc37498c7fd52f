//! # 加载会话集成测试
//!
//! 测试 配置 → 资源来源 → ResourceCache → 加载会话 的完整链路。
//! 资源文件都写在临时目录里。

use fsn_core::{Category, ResourceCache, ResourceError, ResourceLoader};
use fsn_host::{
    AppConfig, AssetSourceType, FsSource, PreloadPlan, SourceStore, TextAsset, Texture, ZipSource,
    create_cache, find_missing, run_preload,
};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 创建测试用的资源目录
fn write_assets(root: &Path) {
    std::fs::create_dir_all(root.join("bg")).unwrap();
    std::fs::create_dir_all(root.join("scripts")).unwrap();

    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 128]));
    img.save(root.join("bg/room.png")).unwrap();
    img.save(root.join("bg/street.png")).unwrap();

    std::fs::write(root.join("scripts/intro.txt"), "第一章").unwrap();
    std::fs::write(root.join("scripts/ending.txt"), "终章").unwrap();
}

fn fs_config(root: &Path) -> AppConfig {
    AppConfig {
        assets_root: root.to_path_buf(),
        ..AppConfig::default()
    }
}

fn plan(category: Category, names: &[&str]) -> PreloadPlan {
    let mut plan = PreloadPlan::new();
    plan.insert(category, names.iter().map(|n| n.to_string()).collect());
    plan
}

#[test]
fn test_texture_and_text_from_fs() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());

    let (mut cache, _) = create_cache(&fs_config(dir.path())).unwrap();

    let room = cache.load::<Texture>(Category::Script, "bg/room.png").unwrap();
    assert_eq!((room.width, room.height), (3, 2));
    assert_eq!(room.pixels.len(), room.size_bytes());
    assert_eq!(&room.pixels[..4], &[255, 0, 0, 128]);

    let intro = cache
        .load::<TextAsset>(Category::Script, "scripts/intro.txt")
        .unwrap();
    assert_eq!(intro.0, "第一章");

    let again = cache.load::<Texture>(Category::Script, "bg/room.png").unwrap();
    assert!(Arc::ptr_eq(&room, &again));
}

#[test]
fn test_scene_switch_with_preload() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let (mut cache, _) = create_cache(&fs_config(dir.path())).unwrap();

    let first = run_preload(
        &mut cache,
        &plan(Category::Script, &["bg/room.png", "scripts/intro.txt"]),
    )
    .unwrap();
    assert!(first.is_ok());
    assert_eq!(first.sessions[0].retained, 2);
    assert!(first.sessions[0].evicted.is_empty());

    let room = cache.get::<Texture>(Category::Script, "bg/room.png").unwrap();

    let second = run_preload(
        &mut cache,
        &plan(Category::Script, &["./bg/room.png", "bg/street.png"]),
    )
    .unwrap();
    assert_eq!(second.sessions[0].evicted, vec!["scripts/intro.txt"]);
    assert_eq!(
        cache.names(Category::Script),
        vec!["bg/room.png", "bg/street.png"]
    );

    // 复用的纹理是同一个实例
    let room_after = cache.get::<Texture>(Category::Script, "bg/room.png").unwrap();
    assert!(Arc::ptr_eq(&room.unwrap(), &room_after.unwrap()));
}

#[test]
fn test_preload_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let (mut cache, source) = create_cache(&fs_config(dir.path())).unwrap();

    let plan = plan(Category::Ui, &["ui/missing.png", "scripts/intro.txt"]);
    let report = run_preload(&mut cache, &plan).unwrap();

    assert!(!report.is_ok());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error,
        ResourceError::NotFound {
            category: Category::Ui,
            name: "ui/missing.png".to_string(),
        }
    );
    assert!(cache.contains(Category::Ui, "scripts/intro.txt"));
    assert!(!cache.is_session_active());

    let missing = find_missing(source.as_ref(), &plan);
    assert_eq!(missing, vec![(Category::Ui, "ui/missing.png".to_string())]);
}

#[test]
fn test_undecodable_texture() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let (mut cache, _) = create_cache(&fs_config(dir.path())).unwrap();

    let err = cache
        .load::<Texture>(Category::Script, "scripts/intro.txt")
        .unwrap_err();
    assert!(matches!(err, ResourceError::Undecodable { .. }));
    assert!(!cache.contains(Category::Script, "scripts/intro.txt"));
}

#[test]
fn test_zip_source_reclaimed_after_session() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("game.zip");
    {
        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in [("scripts/a.txt", b"A"), ("scripts/b.txt", b"B")] {
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    let zip = Arc::new(ZipSource::new(&zip_path));
    let mut cache = ResourceCache::new(SourceStore::new(zip.clone()));
    let reclaim = zip.clone();
    cache.set_reclaim_hook(move || fsn_host::ResourceSource::release_unused(reclaim.as_ref()));

    cache.start_loading_session(Category::Script).unwrap();
    let a = cache.load::<TextAsset>(Category::Script, "assets/scripts/a.txt").unwrap();
    assert_eq!(a.0, "A");
    assert!(zip.is_indexed());

    cache.end_loading_session().unwrap();
    assert!(!zip.is_indexed());
}

#[test]
fn test_zip_config_requires_path() {
    let config = AppConfig {
        asset_source: AssetSourceType::Zip,
        ..AppConfig::default()
    };
    assert!(create_cache(&config).is_err());
}

/// 模拟 GPU 纹理：加载/卸载都记账
struct GpuTexture {
    name: String,
}

impl fsn_core::Resource for GpuTexture {}

#[derive(Clone, Default)]
struct GpuUploader {
    uploads: Arc<AtomicUsize>,
    released: Arc<Mutex<Vec<String>>>,
}

impl ResourceLoader for GpuUploader {
    type Output = GpuTexture;

    fn load(&self, name: &str) -> Result<GpuTexture, ResourceError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(GpuTexture {
            name: name.to_string(),
        })
    }

    fn unload(&self, resource: &GpuTexture) {
        self.released.lock().unwrap().push(resource.name.clone());
    }
}

#[test]
fn test_custom_loader_alongside_source() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());

    let uploader = GpuUploader::default();
    let mut cache = ResourceCache::new(SourceStore::new(Arc::new(FsSource::new(dir.path()))));
    cache.install_loader(uploader.clone());

    cache.start_loading_session(Category::Script).unwrap();
    cache.load::<GpuTexture>(Category::Script, "gpu/hero").unwrap();
    cache.load::<TextAsset>(Category::Script, "scripts/ending.txt").unwrap();
    cache.end_loading_session().unwrap();

    cache.start_loading_session(Category::Script).unwrap();
    cache.load::<TextAsset>(Category::Script, "scripts/ending.txt").unwrap();
    let summary = cache.end_loading_session().unwrap();

    assert_eq!(summary.evicted, vec!["gpu/hero"]);
    assert_eq!(uploader.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(*uploader.released.lock().unwrap(), vec!["gpu/hero"]);
}
