//! # Category 模块
//!
//! 资源命名空间的固定划分。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 资源分类
///
/// 决定资源存放在哪个 [`Depot`](super::Depot) 中。
/// 同名资源在不同分类下互不影响。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 引擎常驻资源（字体、系统 UI 等）
    Engine,
    /// 脚本资源（背景、立绘、音频等随场景切换的资源）
    Script,
    /// UI 资源
    Ui,
}

impl Category {
    /// 全部分类
    pub const ALL: [Category; 3] = [Category::Engine, Category::Script, Category::Ui];

    /// 小写名称（与配置文件一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Engine => "engine",
            Category::Script => "script",
            Category::Ui => "ui",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
