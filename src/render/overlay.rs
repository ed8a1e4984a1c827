//! Loader, play icon and canvas fades.

/// Linear opacity transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    start_ms: f64,
    duration_ms: f64,
}

impl Fade {
    /// Resting at `opacity`
    pub fn fixed(opacity: f32) -> Self {
        Self {
            from: opacity,
            to: opacity,
            start_ms: 0.0,
            duration_ms: 0.0,
        }
    }

    pub fn value(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 || now_ms >= self.start_ms + self.duration_ms {
            return self.to;
        }
        if now_ms <= self.start_ms {
            return self.from;
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms) as f32;
        self.from + (self.to - self.from) * t
    }

    /// Start moving from the current value towards `to`
    pub fn retarget(&mut self, to: f32, now_ms: f64, duration_ms: f64) {
        if self.to == to {
            return;
        }
        *self = Self {
            from: self.value(now_ms),
            to,
            start_ms: now_ms,
            duration_ms,
        };
    }
}

/// Opacities of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    pub loader: f32,
    pub play_icon: f32,
    pub canvas: f32,
}

/// Loader, play icon and canvas visibility
#[derive(Debug, Clone)]
pub struct Overlay {
    loader: Fade,
    play_icon: Fade,
    canvas: Fade,
    fade_ms: f64,
}

impl Overlay {
    /// Loading state: loader shown, icon and canvas hidden
    pub fn new(fade_ms: f64) -> Self {
        Self {
            loader: Fade::fixed(1.0),
            play_icon: Fade::fixed(0.0),
            canvas: Fade::fixed(0.0),
            fade_ms,
        }
    }

    /// Assets are in: hide the loader, reveal the play icon
    pub fn loading_complete(&mut self, now_ms: f64) {
        self.loader.retarget(0.0, now_ms, self.fade_ms);
        self.play_icon.retarget(1.0, now_ms, self.fade_ms);
    }

    /// Playback started: hide the icon, show the canvas
    pub fn playing(&mut self, now_ms: f64) {
        self.play_icon.retarget(0.0, now_ms, self.fade_ms);
        self.canvas.retarget(1.0, now_ms, self.fade_ms);
    }

    pub fn frame(&self, now_ms: f64) -> OverlayFrame {
        OverlayFrame {
            loader: self.loader.value(now_ms),
            play_icon: self.play_icon.value(now_ms),
            canvas: self.canvas.value(now_ms),
        }
    }
}
