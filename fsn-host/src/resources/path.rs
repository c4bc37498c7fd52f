//! # 路径规范化模块
//!
//! 缓存键和资源来源统一使用**逻辑路径**：
//!
//! - 相对于 assets_root，不包含 `assets/` 前缀
//! - 使用 `/` 作为分隔符
//! - `.` 和 `..` 已被消解
//!
//! 同一个资源无论写成 `assets\bg\room.png` 还是 `./bg/../bg/room.png`，
//! 都会落到同一个缓存条目上。

/// 规范化逻辑路径
///
/// `..` 越过根目录时被忽略。
pub fn normalize_logical_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut components: Vec<&str> = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    if components.first() == Some(&"assets") {
        components.remove(0);
    }

    components.join("/")
}

/// 取逻辑路径的扩展名（小写，不含点）
pub fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .map(|(_, ext)| ext.to_ascii_lowercase())
}
