pub mod api;
pub mod core;
pub mod extensions;
pub mod input;
pub mod puzzles;
pub mod stages;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, ExperienceConfig, Location, Star, Zone, WHEEL_COUNT};
pub use api::stage::{Outcome, StageContext, StageScreen};
pub use api::types::{events, GameEvent, LocationId, StageKind, StarId};
pub use core::controller::{ExperienceView, JumpError, StageController};
pub use core::session::{MemoryStore, SessionStore, StoreError, DEBUG_UNLOCKED_KEY, VISITOR_NAME_KEY};
pub use core::timer::Transient;
pub use input::event::InputEvent;
pub use puzzles::{
    normalize_letter, ClickOutcome, CodeCheck, CombinationLock, Constellation, EdgeKey,
    GateOutcome, GuessOutcome, IdentityGate, LocationSequence, PhraseCell, PhraseReveal,
    SealOutcome, SelectOutcome, VisitorIdentity, WaxSeal, WheelFeedback,
};
pub use stages::StageView;

// Extensions: presentation helpers, independent of the puzzle engines
pub use extensions::{
    ease, lerp, AnimatedValue, Easing, Property, Sequence, SequenceId, Step, Timeline, Tween,
    TweenLoop,
};
