//! # Preload 模块
//!
//! 按配置的预加载表，为每个分类执行一次加载会话。

use crate::resources::{AssetKind, ResourceSource, path::normalize_logical_path};
use fsn_core::{Category, ResourceCache, ResourceError, SessionSummary};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 预加载表（分类 -> 资源名）
pub type PreloadPlan = BTreeMap<Category, Vec<String>>;

/// 单个资源加载失败
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadFailure {
    pub category: Category,
    pub name: String,
    pub error: ResourceError,
}

/// 预加载结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreloadReport {
    /// 每个分类的会话结果
    pub sessions: Vec<SessionSummary>,
    /// 加载失败的资源（不会中断会话）
    pub failures: Vec<PreloadFailure>,
}

impl PreloadReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 执行预加载
///
/// 每个分类一个会话：会话内加载表中的资源，结束时卸载不再需要的旧资源。
/// 单个资源失败只记录，不会中断会话；只有会话本身出错（如会话重叠）才返回 `Err`。
pub fn run_preload(cache: &mut ResourceCache, plan: &PreloadPlan) -> Result<PreloadReport, ResourceError> {
    let mut report = PreloadReport::default();

    for (&category, names) in plan {
        cache.start_loading_session(category)?;

        for name in names {
            let logical = normalize_logical_path(name);
            if let Err(error) = AssetKind::from_name(&logical).load(cache, category, &logical) {
                warn!(category = %category, name = %logical, error = %error, "预加载失败");
                report.failures.push(PreloadFailure {
                    category,
                    name: logical,
                    error,
                });
            }
        }

        let summary = cache.end_loading_session()?;
        info!(
            category = %category,
            retained = summary.retained,
            evicted = summary.evicted.len(),
            "预加载完成"
        );
        report.sessions.push(summary);
    }

    Ok(report)
}

/// 检查预加载表中的资源是否都存在于来源中
///
/// 返回缺失的 (分类, 逻辑路径)。
pub fn find_missing(source: &dyn ResourceSource, plan: &PreloadPlan) -> Vec<(Category, String)> {
    plan.iter()
        .flat_map(|(&category, names)| {
            names
                .iter()
                .map(|name| normalize_logical_path(name))
                .filter(|logical| !source.exists(logical))
                .map(move |logical| (category, logical))
        })
        .collect()
}
