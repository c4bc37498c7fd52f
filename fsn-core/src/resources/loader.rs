//! # Loader 模块
//!
//! 资源类型、自定义加载器与默认资源库的接口定义。
//!
//! ## 加载顺序
//!
//! 1. 如果为结果类型注册了自定义加载器，交给它处理
//! 2. 否则通过 [`ResourceStore`] 按名称查找字节，再用 [`Resource::decode`] 解码

use super::depot::{ErasedValue, ResourceHandle};
use crate::error::ResourceError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// 可被缓存的资源类型
pub trait Resource: Send + Sync + Sized + 'static {
    /// 从默认资源库读取的字节解码
    ///
    /// 只通过自定义加载器产生的类型不需要实现，默认返回 `Undecodable`。
    fn decode(name: &str, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        let _ = bytes;
        Err(ResourceError::Undecodable {
            name: name.to_string(),
            kind: std::any::type_name::<Self>(),
            message: "该类型只能由自定义加载器提供".to_string(),
        })
    }
}

/// 自定义加载器
///
/// 每种结果类型最多注册一个，后注册的覆盖先注册的。
pub trait ResourceLoader: Send + Sync {
    /// 加载结果类型
    type Output: Resource;

    /// 加载资源
    fn load(&self, name: &str) -> Result<Self::Output, ResourceError>;

    /// 释放资源（驱逐时调用，每次驱逐恰好一次）
    fn unload(&self, resource: &Self::Output) {
        let _ = resource;
    }
}

/// 默认资源库
///
/// 由宿主提供的按名称查找设施。找不到时返回 `Ok(None)`，
/// 读取过程中出错时返回 `Err`。
pub trait ResourceStore: Send + Sync {
    fn lookup(&self, name: &str) -> Result<Option<Vec<u8>>, ResourceError>;
}

/// 什么也不提供的资源库
///
/// 适用于所有资源都由自定义加载器产生的场景。
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl ResourceStore for NullStore {
    fn lookup(&self, _name: &str) -> Result<Option<Vec<u8>>, ResourceError> {
        Ok(None)
    }
}

/// 类型擦除后的加载器
trait ErasedLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<ResourceHandle, ResourceError>;
    fn unload(&self, value: &(dyn Any + Send + Sync));
}

struct TypedLoader<L>(L);

impl<L: ResourceLoader> ErasedLoader for TypedLoader<L> {
    fn load(&self, name: &str) -> Result<ResourceHandle, ResourceError> {
        let value = self.0.load(name)?;
        Ok(ResourceHandle::new(Arc::new(value)))
    }

    fn unload(&self, value: &(dyn Any + Send + Sync)) {
        if let Some(resource) = value.downcast_ref::<L::Output>() {
            self.0.unload(resource);
        }
    }
}

/// 自定义加载器注册表（结果类型 -> 加载器）
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<TypeId, Box<dyn ErasedLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册加载器，返回是否覆盖了旧的注册
    pub fn install<L: ResourceLoader + 'static>(&mut self, loader: L) -> bool {
        self.loaders
            .insert(TypeId::of::<L::Output>(), Box::new(TypedLoader(loader)))
            .is_some()
    }

    /// 使用 `T` 的加载器加载资源；没有注册时返回 None
    pub(crate) fn load<T: Resource>(
        &self,
        name: &str,
    ) -> Option<Result<ResourceHandle, ResourceError>> {
        self.loaders
            .get(&TypeId::of::<T>())
            .map(|loader| loader.load(name))
    }

    /// 按句柄声明的类型卸载
    ///
    /// 返回是否找到了对应的卸载器。没有卸载器时视为资源无需显式释放。
    pub(crate) fn unload(&self, handle: &ResourceHandle) -> bool {
        match self.loaders.get(&handle.type_id()) {
            Some(loader) => {
                let value: &ErasedValue = handle.value();
                loader.unload(value.as_ref());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("loaders", &self.loaders.len())
            .finish()
    }
}
