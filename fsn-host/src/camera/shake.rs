//! # Camera Shake 模块
//!
//! 线性衰减的镜头震动。偏移量完全由经过的时间决定，同样的输入得到同样的结果。

use std::f32::consts::TAU;

/// 镜头震动
#[derive(Debug, Clone, Default)]
pub struct CameraShake {
    amplitude: f32,
    frequency: f32,
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl CameraShake {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始震动，取代进行中的震动
    ///
    /// # 参数
    ///
    /// - `amplitude`: 最大偏移（像素）
    /// - `frequency`: 每秒往返次数
    /// - `duration`: 持续时长（秒）
    pub fn start(&mut self, amplitude: f32, frequency: f32, duration: f32) {
        if amplitude <= 0.0 || duration <= 0.0 {
            self.stop();
            return;
        }

        self.amplitude = amplitude;
        self.frequency = frequency.max(0.0);
        self.duration = duration;
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }

    /// 推进时间并返回当前偏移 `(x, y)`，空闲时为 `(0.0, 0.0)`
    pub fn update(&mut self, dt: f32) -> (f32, f32) {
        if !self.active {
            return (0.0, 0.0);
        }

        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.stop();
            return (0.0, 0.0);
        }

        self.offset()
    }

    /// 当前偏移（不推进时间）
    pub fn offset(&self) -> (f32, f32) {
        if !self.active {
            return (0.0, 0.0);
        }

        let decay = 1.0 - self.elapsed / self.duration;
        let phase = TAU * self.frequency * self.elapsed;
        let magnitude = self.amplitude * decay;
        // y 轴用不同的相位速度，避免沿对角线来回
        (magnitude * phase.sin(), magnitude * (phase * 1.3).cos())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
