//! # Resources 模块
//!
//! 分类资源缓存：仓库、自定义加载器与加载会话。

mod cache;
mod category;
mod depot;
mod loader;

pub use cache::{CacheStats, ReclaimHook, ResourceCache, SessionSummary};
pub use category::Category;
pub use depot::{Depot, ErasedValue, ResourceHandle};
pub use loader::{LoaderRegistry, NullStore, Resource, ResourceLoader, ResourceStore};
