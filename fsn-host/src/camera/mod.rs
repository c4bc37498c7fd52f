//! # Camera 模块
//!
//! 逐帧推进的画面控制器：屏幕淡入淡出与镜头震动。
//! 只计算数值（alpha、偏移），由渲染层读取后使用。

mod easing;
mod fade;
mod shake;

pub use easing::EasingFunction;
pub use fade::ScreenFade;
pub use shake::CameraShake;

use fsn_core::CallRegistry;
use std::sync::{Arc, Mutex};

/// 淡入淡出默认时长（秒）
pub const DEFAULT_FADE_DURATION: f32 = 0.5;

/// 把画面控制器注册为脚本函数
///
/// - `FadeOut [时长]` / `FadeIn [时长]`
/// - `ShakeCamera 幅度 [频率] [时长]`
/// - `IsFading`（bool）
pub fn register_camera_calls(
    registry: &mut CallRegistry,
    fade: Arc<Mutex<ScreenFade>>,
    shake: Arc<Mutex<CameraShake>>,
) {
    let fade_out = fade.clone();
    registry.register_void("FadeOut", move |args| {
        if let Ok(mut fade) = fade_out.lock() {
            fade.fade_out(arg_f32(args, 0).unwrap_or(DEFAULT_FADE_DURATION));
        }
    });

    let fade_in = fade.clone();
    registry.register_void("FadeIn", move |args| {
        if let Ok(mut fade) = fade_in.lock() {
            fade.fade_in(arg_f32(args, 0).unwrap_or(DEFAULT_FADE_DURATION));
        }
    });

    registry.register_void("ShakeCamera", move |args| {
        let Some(amplitude) = arg_f32(args, 0) else {
            tracing::warn!(?args, "ShakeCamera 缺少幅度参数");
            return;
        };
        if let Ok(mut shake) = shake.lock() {
            shake.start(
                amplitude,
                arg_f32(args, 1).unwrap_or(12.0),
                arg_f32(args, 2).unwrap_or(0.4),
            );
        }
    });

    registry.register_bool("IsFading", move |_| {
        fade.lock().map(|fade| fade.is_active()).unwrap_or(false)
    });
}

fn arg_f32(args: &[String], index: usize) -> Option<f32> {
    args.get(index).and_then(|a| a.parse().ok())
}
