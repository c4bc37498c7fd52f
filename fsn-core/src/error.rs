//! # Error 模块
//!
//! 定义 fsn-core 中使用的错误类型。

use crate::resources::Category;
use thiserror::Error;

/// 资源缓存错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// 资源名为空
    #[error("资源名不能为空")]
    EmptyName,

    /// 自定义加载器和默认资源库都没有提供该资源
    #[error("资源未找到: [{category}] {name}")]
    NotFound { category: Category, name: String },

    /// 缓存中的资源类型与请求类型不一致
    #[error("资源类型不匹配: [{category}] {name}，期望 {expected}，实际 {actual}")]
    TypeMismatch {
        category: Category,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// 资源字节无法解码为目标类型
    #[error("无法将 {name} 解码为 {kind}: {message}")]
    Undecodable {
        name: String,
        kind: &'static str,
        message: String,
    },

    /// 资源读取失败（IO、压缩包等）
    #[error("加载 {kind} 资源失败: {path} - {message}")]
    LoadFailed {
        path: String,
        kind: String,
        message: String,
    },

    /// 已有加载会话进行中
    #[error("加载会话 [{active}] 尚未结束，拒绝开启 [{requested}]")]
    SessionAlreadyActive {
        active: Category,
        requested: Category,
    },

    /// 没有进行中的加载会话
    #[error("当前没有进行中的加载会话")]
    NoActiveSession,
}

/// 脚本调用错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// 函数未注册
    #[error("未注册的函数: {name}")]
    Unregistered { name: String },

    /// 调用语句为空
    #[error("调用语句为空")]
    EmptyCall,
}

/// Result 类型别名
pub type ResourceResult<T> = Result<T, ResourceError>;
