// extensions/mod.rs
//
// Presentation helpers. Stages describe animations here; nothing in the
// puzzle engines depends on them.

pub mod easing;
pub mod tween;

pub use easing::{ease, lerp, Easing};
pub use tween::{AnimatedValue, Property, Sequence, SequenceId, Step, Timeline, Tween, TweenLoop};
