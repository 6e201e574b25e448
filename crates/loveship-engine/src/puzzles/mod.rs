// puzzles/mod.rs
//
// Pure puzzle engines. No timers, no animation, no persistence beyond what
// the identity gate is handed. The stage screens layer presentation on top.

pub mod constellation;
pub mod identity;
pub mod lock;
pub mod phrase;
pub mod seal;
pub mod sequence;

pub use constellation::{Constellation, EdgeKey, SelectOutcome};
pub use identity::{GateOutcome, IdentityGate, VisitorIdentity};
pub use lock::{CodeCheck, CombinationLock, WheelFeedback};
pub use phrase::{normalize_letter, GuessOutcome, PhraseCell, PhraseReveal};
pub use seal::{SealOutcome, WaxSeal};
pub use sequence::{ClickOutcome, LocationSequence};
