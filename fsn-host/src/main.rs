//! # FSN Headless
//!
//! 不开窗口运行资源预加载，用于检查资源包和配置。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p fsn-host -- preload
//! cargo run -p fsn-host -- --config release.json check
//! cargo run -p fsn-host -- --log-level debug preload
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fsn_host::{AppConfig, create_cache, find_missing, run_preload};
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "fsn-headless")]
#[command(about = "FSN 资源预加载 / 检查工具")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json）
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long, default_value = "info", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对每个分类执行一次预加载会话并输出结果
    Preload,

    /// 验证配置，并确认预加载表中的资源都存在
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config);

    match cli.command {
        Commands::Preload => preload(&config),
        Commands::Check => check(&config),
    }
}

fn preload(config: &AppConfig) -> anyhow::Result<()> {
    config.validate().context("配置无效")?;
    let (mut cache, _source) = create_cache(config)?;

    let report = run_preload(&mut cache, &config.resources.preload)?;
    for summary in &report.sessions {
        println!(
            "[{}] 保留 {} 个，卸载 {} 个",
            summary.category,
            summary.retained,
            summary.evicted.len()
        );
    }
    for failure in &report.failures {
        println!("  ✗ [{}] {}: {}", failure.category, failure.name, failure.error);
    }
    println!("{}", cache.stats().format());

    let evicted = cache.unload_all();
    info!(evicted = evicted, "缓存已清空");

    if !report.is_ok() {
        bail!("{} 个资源加载失败", report.failures.len());
    }
    Ok(())
}

fn check(config: &AppConfig) -> anyhow::Result<()> {
    config.validate().context("配置无效")?;
    let (_cache, source) = create_cache(config)?;

    let missing = find_missing(source.as_ref(), &config.resources.preload);
    if missing.is_empty() {
        println!("✅ 配置有效，预加载资源全部存在");
        return Ok(());
    }

    for (category, name) in &missing {
        println!("  ✗ [{}] {}", category, source.full_path(name));
    }
    bail!("{} 个预加载资源缺失", missing.len());
}
