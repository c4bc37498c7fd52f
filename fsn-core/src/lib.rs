//! # FSN Core
//!
//! FSN 引擎的纯逻辑核心：分类资源缓存与脚本函数注册表。
//!
//! ## 架构概述
//!
//! `fsn-core` 不做任何 IO。实际的字节读取由宿主通过 [`ResourceStore`] 提供，
//! 特殊资源的加载与释放通过 [`ResourceLoader`] 注入：
//!
//! ```text
//! Host                              Core
//!   │── install_loader / store ──────►│
//!   │── start_loading_session ───────►│
//!   │── load(category, name) ────────►│ 自定义加载器 / 默认资源库
//!   │── end_loading_session ─────────►│ 卸载未被复用的资源
//!   │◄──────────── SessionSummary ────│
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut cache = ResourceCache::new(store);
//! cache.install_loader(TextureLoader::new(device));
//!
//! cache.start_loading_session(Category::Script)?;
//! for name in scene.resources() {
//!     cache.load::<Texture>(Category::Script, name)?;
//! }
//! let summary = cache.end_loading_session()?;
//! ```
//!
//! ## 模块结构
//!
//! - [`resources`]：分类、仓库、加载器、缓存与加载会话
//! - [`unity_call`]：脚本函数注册表
//! - [`error`]：错误类型定义

pub mod error;
pub mod resources;
pub mod unity_call;

// 重导出核心类型
pub use error::{CallError, ResourceError, ResourceResult};
pub use resources::{
    CacheStats, Category, Depot, NullStore, Resource, ResourceCache, ResourceHandle,
    ResourceLoader, ResourceStore, SessionSummary,
};
pub use unity_call::{CallKind, CallOutcome, CallRegistry};
