//! # FSN Host
//!
//! FSN 引擎的宿主层：把 `fsn-core` 的资源缓存接到实际的资源来源上。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 配置加载与验证
//! - 资源来源（文件系统 / ZIP 包）与内置资源类型的解码
//! - 预加载会话
//! - 屏幕淡入淡出、镜头震动等画面控制器，以及对应的脚本函数
//!
//! 缓存和会话的语义全部在 `fsn-core` 中，Host 层只负责 IO。

pub mod camera;
pub mod config;
pub mod preload;
pub mod resources;

pub use camera::{CameraShake, EasingFunction, ScreenFade, register_camera_calls};
pub use config::{AppConfig, AssetSourceType, ConfigError, ResourceConfig};
pub use preload::{PreloadFailure, PreloadPlan, PreloadReport, find_missing, run_preload};
pub use resources::{
    AssetKind, FsSource, RawAsset, ResourceSource, SourceStore, TextAsset, Texture, ZipSource,
    create_cache, create_source, load_asset,
};
