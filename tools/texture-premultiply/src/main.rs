//! # Texture Premultiply
//!
//! 纹理预乘工具 - 把直通 alpha 的 PNG 转换为预乘 alpha，
//! 供使用预乘混合模式的渲染层直接加载。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p texture-premultiply -- assets/ui
//! cargo run -p texture-premultiply -- assets/ui --output build/ui
//! cargo run -p texture-premultiply -- assets/bg/room.png --dry-run
//! ```

use anyhow::{Context, bail};
use clap::Parser;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "premultiply")]
#[command(about = "纹理预乘工具 - 将直通 alpha 的 PNG 转换为预乘 alpha")]
#[command(version)]
struct Cli {
    /// 输入文件或目录
    input: PathBuf,

    /// 输出文件或目录（默认：原地覆盖）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 只统计，不写文件
    #[arg(long)]
    dry_run: bool,
}

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// 有半透明像素，已转换
    Converted,
    /// 完全不透明，预乘前后相同
    Opaque,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("❌ 预乘失败: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.input.exists() {
        bail!("输入路径不存在: {:?}", cli.input);
    }

    let jobs = collect_jobs(&cli.input, cli.output.as_deref());
    if jobs.is_empty() {
        println!("没有找到 PNG 文件: {:?}", cli.input);
        return Ok(());
    }

    let mut converted = 0;
    for (input, output) in &jobs {
        let outcome = process_file(input, output, cli.dry_run)?;
        if outcome == Outcome::Converted {
            converted += 1;
            println!("  * {}", input.display());
        }
    }

    println!();
    println!(
        "✅ 完成：{} 个文件，{} 个含半透明像素{}",
        jobs.len(),
        converted,
        if cli.dry_run { "（dry run，未写入）" } else { "" }
    );
    Ok(())
}

/// 列出 (输入, 输出) 文件对
///
/// 输入为目录时递归查找 `.png`，输出目录保持相同的相对结构。
fn collect_jobs(input: &Path, output: Option<&Path>) -> Vec<(PathBuf, PathBuf)> {
    if input.is_file() {
        let target = output.unwrap_or(input).to_path_buf();
        return vec![(input.to_path_buf(), target)];
    }

    let mut jobs: Vec<(PathBuf, PathBuf)> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_png(e.path()))
        .map(|e| {
            let path = e.into_path();
            let target = match output {
                Some(out_dir) => out_dir.join(path.strip_prefix(input).unwrap_or(&path)),
                None => path.clone(),
            };
            (path, target)
        })
        .collect();
    jobs.sort();
    jobs
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn process_file(input: &Path, output: &Path, dry_run: bool) -> anyhow::Result<Outcome> {
    let mut img = image::open(input)
        .with_context(|| format!("无法读取图片 {:?}", input))?
        .to_rgba8();

    let outcome = if premultiply(&mut img) {
        Outcome::Converted
    } else {
        Outcome::Opaque
    };

    // 输出到其他位置时，不透明图片也要写出
    let needs_write = outcome == Outcome::Converted || output != input;
    if !dry_run && needs_write {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建目录 {:?}", parent))?;
        }
        img.save(output)
            .with_context(|| format!("无法写入图片 {:?}", output))?;
    }
    Ok(outcome)
}

/// 原地预乘，返回是否存在非完全不透明的像素
fn premultiply(img: &mut RgbaImage) -> bool {
    let mut translucent = false;
    for pixel in img.pixels_mut() {
        let alpha = pixel[3] as u32;
        if alpha == 255 {
            continue;
        }
        translucent = true;
        for channel in &mut pixel.0[..3] {
            *channel = ((*channel as u32 * alpha + 127) / 255) as u8;
        }
    }
    translucent
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_premultiply_values() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([255, 128, 0, 128]));
        assert!(premultiply(&mut img));
        assert_eq!(img.get_pixel(0, 0).0, [128, 64, 0, 128]);

        let mut clear = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 0]));
        premultiply(&mut clear);
        assert_eq!(clear.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_opaque_untouched() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        assert!(!premultiply(&mut img));
        assert_eq!(img.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_collect_jobs_mirrors_tree() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ui");
        std::fs::create_dir_all(input.join("icons")).unwrap();
        std::fs::write(input.join("icons/a.PNG"), b"").unwrap();
        std::fs::write(input.join("b.png"), b"").unwrap();
        std::fs::write(input.join("notes.txt"), b"").unwrap();

        let out = dir.path().join("out");
        let jobs = collect_jobs(&input, Some(&out));
        assert_eq!(
            jobs,
            vec![
                (input.join("b.png"), out.join("b.png")),
                (input.join("icons/a.PNG"), out.join("icons/a.PNG")),
            ]
        );
    }

    #[test]
    fn test_process_file_dry_run_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("half.png");
        RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 51]))
            .save(&input)
            .unwrap();

        let output = dir.path().join("out/half.png");
        assert_eq!(process_file(&input, &output, true).unwrap(), Outcome::Converted);
        assert!(!output.exists());

        assert_eq!(process_file(&input, &output, false).unwrap(), Outcome::Converted);
        let written = image::open(&output).unwrap().to_rgba8();
        assert_eq!(written.get_pixel(0, 0).0, [51, 51, 51, 51]);
    }

    #[test]
    fn test_output_dir_keeps_opaque_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ui");
        std::fs::create_dir_all(&input).unwrap();
        RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]))
            .save(input.join("opaque.png"))
            .unwrap();
        RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 51]))
            .save(input.join("half.png"))
            .unwrap();

        let out = dir.path().join("out");
        let cli = Cli {
            input: input.clone(),
            output: Some(out.clone()),
            dry_run: false,
        };
        run(&cli).unwrap();

        let opaque = image::open(out.join("opaque.png")).unwrap().to_rgba8();
        assert_eq!(opaque.get_pixel(0, 0).0, [10, 20, 30, 255]);
        let half = image::open(out.join("half.png")).unwrap().to_rgba8();
        assert_eq!(half.get_pixel(0, 0).0, [51, 51, 51, 51]);
    }

    #[test]
    fn test_in_place_skips_opaque_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opaque.png");
        RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        assert_eq!(process_file(&path, &path, false).unwrap(), Outcome::Opaque);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
