//! # Resource Cache 模块
//!
//! 按分类管理的资源缓存，支持"加载会话"式的批量替换。
//!
//! ## 加载会话
//!
//! 场景切换时，宿主在 `start_loading_session` 和 `end_loading_session` 之间
//! 对新场景需要的每个资源调用 `load`。会话结束时，旧资源集中
//! 没有在本次会话里被加载过的资源会被卸载，其余资源原样保留。
//!
//! ```text
//! Idle ──start(category)──► SessionActive(category) ──end()──► Idle
//! ```

use super::category::Category;
use super::depot::{Depot, ResourceHandle};
use super::loader::{LoaderRegistry, NullStore, Resource, ResourceLoader, ResourceStore};
use crate::error::{ResourceError, ResourceResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 进行中的加载会话
#[derive(Debug)]
struct LoadingSession {
    category: Category,
    /// 本次会话中被加载（或命中）的资源
    pending: Depot,
}

/// 会话结束时的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// 会话所属分类
    pub category: Category,
    /// 会话结束后该分类保留的资源数量
    pub retained: usize,
    /// 被驱逐的资源名（已排序）
    pub evicted: Vec<String>,
}

/// 宿主提供的"回收未引用资源"回调
pub type ReclaimHook = Box<dyn FnMut() + Send>;

/// 资源缓存
///
/// 特性：
/// - 每个分类一个 [`Depot`]，首次访问时创建
/// - 按结果类型注册自定义加载器，未注册时回退到默认资源库
/// - 加载会话：结束时自动卸载未被复用的旧资源
pub struct ResourceCache {
    depots: HashMap<Category, Depot>,
    loaders: LoaderRegistry,
    store: Box<dyn ResourceStore>,
    session: Option<LoadingSession>,
    reclaim_hook: Option<ReclaimHook>,
    /// 统计：命中次数
    hits: u64,
    /// 统计：未命中次数
    misses: u64,
    /// 统计：驱逐次数
    evictions: u64,
    /// 统计：已完成的会话数
    sessions_completed: u64,
}

impl ResourceCache {
    /// 使用指定的默认资源库创建缓存
    pub fn new(store: impl ResourceStore + 'static) -> Self {
        Self {
            depots: HashMap::new(),
            loaders: LoaderRegistry::new(),
            store: Box::new(store),
            session: None,
            reclaim_hook: None,
            hits: 0,
            misses: 0,
            evictions: 0,
            sessions_completed: 0,
        }
    }

    /// 注册自定义加载器，覆盖该类型之前的注册
    pub fn install_loader<L: ResourceLoader + 'static>(&mut self, loader: L) {
        if self.loaders.install(loader) {
            debug!(kind = std::any::type_name::<L::Output>(), "自定义加载器被覆盖");
        }
    }

    /// 设置回收回调（在 `unload_category` 和 `end_loading_session` 之后调用）
    pub fn set_reclaim_hook(&mut self, hook: impl FnMut() + Send + 'static) {
        self.reclaim_hook = Some(Box::new(hook));
    }

    /// 加载资源
    ///
    /// 已缓存时直接返回同一个实例；否则通过自定义加载器或默认资源库加载并缓存。
    /// 如果当前有该分类的加载会话，资源会被记为"仍需要"。
    pub fn load<T: Resource>(&mut self, category: Category, name: &str) -> ResourceResult<Arc<T>> {
        if name.is_empty() {
            return Err(ResourceError::EmptyName);
        }

        let cached = self
            .depots
            .get(&category)
            .and_then(|depot| depot.get(name))
            .cloned();

        let (handle, value) = match cached {
            Some(handle) => {
                let value = downcast_cached::<T>(category, name, &handle)?;
                self.hits += 1;
                (handle, value)
            }
            None => {
                self.misses += 1;
                let handle = self.fetch::<T>(category, name)?;
                let value = downcast_cached::<T>(category, name, &handle)?;
                self.depots
                    .entry(category)
                    .or_default()
                    .insert(name, handle.clone());
                debug!(category = %category, name = name, "资源已加载");
                (handle, value)
            }
        };

        if let Some(session) = self.session.as_mut()
            && session.category == category
        {
            session.pending.insert(name, handle);
        }

        Ok(value)
    }

    /// 获取已缓存的资源（不加载，也不计入会话）
    pub fn get<T: Resource>(&self, category: Category, name: &str) -> ResourceResult<Option<Arc<T>>> {
        match self.depots.get(&category).and_then(|depot| depot.get(name)) {
            Some(handle) => downcast_cached::<T>(category, name, handle).map(Some),
            None => Ok(None),
        }
    }

    /// 检查资源是否已缓存
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.depots
            .get(&category)
            .is_some_and(|depot| depot.contains(name))
    }

    /// 该分类下已缓存的资源数量
    pub fn len(&self, category: Category) -> usize {
        self.depots.get(&category).map_or(0, Depot::len)
    }

    /// 所有分类都没有缓存资源
    pub fn is_empty(&self) -> bool {
        self.depots.values().all(Depot::is_empty)
    }

    /// 该分类下已缓存的资源名（已排序）
    pub fn names(&self, category: Category) -> Vec<String> {
        let mut names: Vec<String> = self
            .depots
            .get(&category)
            .map(|depot| depot.names().map(str::to_string).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// 卸载整个分类
    ///
    /// 返回被驱逐的资源数量。之前返回的引用不应再被使用。
    pub fn unload_category(&mut self, category: Category) -> usize {
        let mut evicted = 0;
        if let Some(depot) = self.depots.get_mut(&category) {
            for (name, handle) in depot.drain() {
                evict(&self.loaders, category, &name, &handle);
                evicted += 1;
            }
        }

        if let Some(session) = self.session.as_mut()
            && session.category == category
        {
            session.pending = Depot::new();
        }

        self.evictions += evicted as u64;
        info!(category = %category, evicted = evicted, "分类已卸载");
        self.reclaim();
        evicted
    }

    /// 卸载所有分类（关闭时调用）
    ///
    /// 进行中的加载会话会被丢弃。
    pub fn unload_all(&mut self) -> usize {
        if let Some(session) = self.session.take() {
            warn!(category = %session.category, "卸载全部资源时丢弃了未结束的加载会话");
        }

        let mut evicted = 0;
        for (category, depot) in self.depots.iter_mut() {
            for (name, handle) in depot.drain() {
                evict(&self.loaders, *category, &name, &handle);
                evicted += 1;
            }
        }

        self.evictions += evicted as u64;
        info!(evicted = evicted, "全部资源已卸载");
        self.reclaim();
        evicted
    }

    /// 开始加载会话
    ///
    /// 同一时间只允许一个会话。已有会话时拒绝，原会话保持不变。
    pub fn start_loading_session(&mut self, category: Category) -> ResourceResult<()> {
        if let Some(active) = &self.session {
            warn!(
                active = %active.category,
                requested = %category,
                "加载会话重叠，已拒绝"
            );
            return Err(ResourceError::SessionAlreadyActive {
                active: active.category,
                requested: category,
            });
        }

        debug!(category = %category, "加载会话开始");
        self.session = Some(LoadingSession {
            category,
            pending: Depot::new(),
        });
        Ok(())
    }

    /// 结束加载会话
    ///
    /// 旧资源中没有在本次会话里加载过的会被卸载，其余保留。
    pub fn end_loading_session(&mut self) -> ResourceResult<SessionSummary> {
        let session = self.session.take().ok_or(ResourceError::NoActiveSession)?;
        let category = session.category;
        let depot = self.depots.entry(category).or_default();

        let mut stale: Vec<String> = depot
            .names()
            .filter(|name| !session.pending.contains(name))
            .map(str::to_string)
            .collect();
        stale.sort();

        for name in &stale {
            if let Some(handle) = depot.remove(name) {
                evict(&self.loaders, category, name, &handle);
            }
        }
        let retained = depot.len();

        self.evictions += stale.len() as u64;
        self.sessions_completed += 1;
        info!(
            category = %category,
            retained = retained,
            evicted = stale.len(),
            "加载会话结束"
        );
        self.reclaim();

        Ok(SessionSummary {
            category,
            retained,
            evicted: stale,
        })
    }

    /// 是否有进行中的加载会话
    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    /// 进行中会话的分类
    pub fn session_category(&self) -> Option<Category> {
        self.session.as_ref().map(|s| s.category)
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.depots.values().map(Depot::len).sum(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            sessions: self.sessions_completed,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
        }
    }

    // === 内部方法 ===

    /// 自定义加载器优先，否则查默认资源库
    fn fetch<T: Resource>(&self, category: Category, name: &str) -> ResourceResult<ResourceHandle> {
        if let Some(result) = self.loaders.load::<T>(name) {
            return result;
        }

        match self.store.lookup(name)? {
            Some(bytes) => {
                let value = T::decode(name, bytes)?;
                Ok(ResourceHandle::new(Arc::new(value)))
            }
            None => {
                debug!(category = %category, name = name, "资源未找到");
                Err(ResourceError::NotFound {
                    category,
                    name: name.to_string(),
                })
            }
        }
    }

    fn reclaim(&mut self) {
        if let Some(hook) = self.reclaim_hook.as_mut() {
            hook();
        }
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(NullStore)
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("depots", &self.depots)
            .field("loaders", &self.loaders)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn downcast_cached<T: Resource>(
    category: Category,
    name: &str,
    handle: &ResourceHandle,
) -> ResourceResult<Arc<T>> {
    handle.downcast::<T>().ok_or_else(|| {
        warn!(
            category = %category,
            name = name,
            expected = std::any::type_name::<T>(),
            actual = handle.type_name(),
            "资源类型不匹配"
        );
        ResourceError::TypeMismatch {
            category,
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            actual: handle.type_name(),
        }
    })
}

fn evict(loaders: &LoaderRegistry, category: Category, name: &str, handle: &ResourceHandle) {
    if !loaders.unload(handle) {
        debug!(
            category = %category,
            name = name,
            kind = handle.type_name(),
            "没有对应的卸载器，直接丢弃"
        );
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// 缓存条目数量（所有分类）
    pub entries: usize,
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 驱逐次数
    pub evictions: u64,
    /// 已完成的加载会话数
    pub sessions: u64,
    /// 命中率
    pub hit_rate: f64,
}

impl CacheStats {
    /// 格式化为可读字符串
    pub fn format(&self) -> String {
        format!(
            "Cache: {} entries, hit rate: {:.1}%, evictions: {}, sessions: {}",
            self.entries,
            self.hit_rate * 100.0,
            self.evictions,
            self.sessions,
        )
    }
}
