//! Drawing: CPU canvas, delayed draw timers, overlay fades and window presentation.

pub mod canvas;
pub mod gpu;
pub mod overlay;
pub mod timers;

pub use canvas::{Canvas, BLACK};
pub use gpu::{RenderSystem, Uniforms};
pub use overlay::{Overlay, OverlayFrame};
pub use timers::{DrawTimers, TimerHandle};
