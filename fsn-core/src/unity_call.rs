//! # Script Call 模块
//!
//! 脚本可调用函数的注册表。
//!
//! 宿主在启动时显式注册函数，脚本按名称调用。
//! 函数只有两种签名：无返回值，或返回 `bool`（用于条件分支）。
//! 调用未注册的函数时返回 [`CallError::Unregistered`]，由调用方决定如何处理。

use crate::error::CallError;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 无返回值的脚本函数
pub type VoidHandler = Box<dyn Fn(&[String]) + Send + Sync>;

/// 返回 bool 的脚本函数
pub type BoolHandler = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// 函数签名类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Void,
    Bool,
}

/// 调用结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// 无返回值的函数执行完毕
    Done,
    /// 返回 bool 的函数的结果
    Bool(bool),
}

enum CallHandler {
    Void(VoidHandler),
    Bool(BoolHandler),
}

impl CallHandler {
    fn kind(&self) -> CallKind {
        match self {
            CallHandler::Void(_) => CallKind::Void,
            CallHandler::Bool(_) => CallKind::Bool,
        }
    }
}

/// 脚本函数注册表
#[derive(Default)]
pub struct CallRegistry {
    handlers: HashMap<String, CallHandler>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册无返回值的函数，同名函数会被覆盖
    pub fn register_void(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&[String]) + Send + Sync + 'static,
    ) {
        self.insert(name.into(), CallHandler::Void(Box::new(handler)));
    }

    /// 注册返回 bool 的函数，同名函数会被覆盖
    pub fn register_bool(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&[String]) -> bool + Send + Sync + 'static,
    ) {
        self.insert(name.into(), CallHandler::Bool(Box::new(handler)));
    }

    fn insert(&mut self, name: String, handler: CallHandler) {
        let kind = handler.kind();
        if let Some(old) = self.handlers.insert(name.clone(), handler) {
            debug!(name = %name, old = ?old.kind(), new = ?kind, "脚本函数被覆盖");
        }
    }

    /// 按名称调用
    pub fn call(&self, name: &str, args: &[String]) -> Result<CallOutcome, CallError> {
        match self.handlers.get(name) {
            Some(CallHandler::Void(handler)) => {
                handler(args);
                Ok(CallOutcome::Done)
            }
            Some(CallHandler::Bool(handler)) => Ok(CallOutcome::Bool(handler(args))),
            None => {
                warn!(name = name, "调用了未注册的函数");
                Err(CallError::Unregistered {
                    name: name.to_string(),
                })
            }
        }
    }

    /// 解析并执行一行调用语句
    ///
    /// 格式：`函数名 参数1 参数2 ...`，以空白分隔。
    pub fn call_line(&self, line: &str) -> Result<CallOutcome, CallError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CallError::EmptyCall)?;
        let args: Vec<String> = parts.map(str::to_string).collect();
        self.call(name, &args)
    }

    /// 获取函数签名类型
    pub fn kind(&self, name: &str) -> Option<CallKind> {
        self.handlers.get(name).map(CallHandler::kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// 已注册的函数名（已排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CallRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallRegistry")
            .field("names", &self.names())
            .finish()
    }
}
