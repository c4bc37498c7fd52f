//! # Depot 模块
//!
//! 单个分类下的资源存储（名称 -> 句柄）。

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// 类型擦除后的资源值
pub type ErasedValue = Arc<dyn Any + Send + Sync>;

/// 缓存中的单个资源
///
/// 除了资源本身，还记录加载时声明的结果类型，驱逐时据此选择卸载器。
#[derive(Clone)]
pub struct ResourceHandle {
    value: ErasedValue,
    type_id: TypeId,
    type_name: &'static str,
}

impl ResourceHandle {
    /// 包装一个已加载的资源
    pub fn new<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 声明的结果类型
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 声明的结果类型名（用于日志和错误信息）
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 类型擦除的资源值
    pub fn value(&self) -> &ErasedValue {
        &self.value
    }

    /// 以具体类型取出资源，类型不符时返回 None
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// 资源仓库
///
/// 一个分类对应一个仓库，名称在仓库内唯一。
#[derive(Debug, Default, Clone)]
pub struct Depot {
    entries: HashMap<String, ResourceHandle>,
}

impl Depot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ResourceHandle> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 插入资源，同名旧句柄会被替换
    pub fn insert(&mut self, name: impl Into<String>, handle: ResourceHandle) {
        self.entries.insert(name.into(), handle);
    }

    pub fn remove(&mut self, name: &str) -> Option<ResourceHandle> {
        self.entries.remove(name)
    }

    /// 取出全部条目并清空仓库
    pub fn drain(&mut self) -> impl Iterator<Item = (String, ResourceHandle)> + '_ {
        self.entries.drain()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
