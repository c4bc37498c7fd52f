//! # Screen Fade 模块
//!
//! 全屏遮罩的淡入淡出控制器。alpha 为 0 时画面完全可见，为 1 时完全被遮住。

use super::easing::EasingFunction;

/// 屏幕淡入淡出
#[derive(Debug, Clone)]
pub struct ScreenFade {
    alpha: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: EasingFunction,
    active: bool,
}

impl Default for ScreenFade {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenFade {
    /// 创建透明（不遮挡）的遮罩
    pub fn new() -> Self {
        Self {
            alpha: 0.0,
            from: 0.0,
            to: 0.0,
            elapsed: 0.0,
            duration: 0.0,
            easing: EasingFunction::Linear,
            active: false,
        }
    }

    /// 从当前 alpha 渐变到目标 alpha
    ///
    /// 时长不大于 0 时立即完成。进行中的渐变会被新的渐变取代。
    pub fn fade_to(&mut self, target: f32, duration: f32, easing: EasingFunction) {
        let target = target.clamp(0.0, 1.0);

        if duration <= 0.0 {
            self.alpha = target;
            self.to = target;
            self.active = false;
            return;
        }

        self.from = self.alpha;
        self.to = target;
        self.elapsed = 0.0;
        self.duration = duration;
        self.easing = easing;
        self.active = true;
    }

    /// 渐变到全黑
    pub fn fade_out(&mut self, duration: f32) {
        self.fade_to(1.0, duration, EasingFunction::EaseInOutQuad);
    }

    /// 从全黑渐变回画面
    pub fn fade_in(&mut self, duration: f32) {
        self.fade_to(0.0, duration, EasingFunction::EaseInOutQuad);
    }

    /// 推进时间
    ///
    /// # 返回
    ///
    /// - `true`: 渐变仍在进行中
    /// - `false`: 渐变已完成或处于空闲状态
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += dt.max(0.0);
        let t = self.progress();
        self.alpha = self.from + (self.to - self.from) * self.easing.apply(t);

        if t >= 1.0 {
            self.alpha = self.to;
            self.active = false;
        }
        self.active
    }

    /// 跳到目标 alpha
    pub fn skip(&mut self) {
        self.alpha = self.to;
        self.active = false;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 当前进度（0.0 - 1.0），空闲时为 1.0
    pub fn progress(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}
