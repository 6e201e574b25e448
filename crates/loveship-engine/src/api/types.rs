use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Identifier of a location on the Riddle 1 maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a star in the Riddle 3 constellation (e.g. `"rigel"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(pub String);

impl StarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The top-level phases of the experience, in playing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Intro,
    Riddle1,
    Riddle2,
    Riddle3,
    Conclusion,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        StageKind::Intro,
        StageKind::Riddle1,
        StageKind::Riddle2,
        StageKind::Riddle3,
        StageKind::Conclusion,
    ];

    /// The stage that follows this one. `None` for the terminal stage.
    pub fn next(self) -> Option<StageKind> {
        match self {
            StageKind::Intro => Some(StageKind::Riddle1),
            StageKind::Riddle1 => Some(StageKind::Riddle2),
            StageKind::Riddle2 => Some(StageKind::Riddle3),
            StageKind::Riddle3 => Some(StageKind::Conclusion),
            StageKind::Conclusion => None,
        }
    }

    /// Position in playing order, used as the numeric stage id on the wire.
    pub fn index(self) -> u32 {
        match self {
            StageKind::Intro => 0,
            StageKind::Riddle1 => 1,
            StageKind::Riddle2 => 2,
            StageKind::Riddle3 => 3,
            StageKind::Conclusion => 4,
        }
    }

    pub fn from_index(index: u32) -> Option<StageKind> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A game event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event (see [`events`]), `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn with_a(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: f32) -> Self {
        self.b = b;
        self
    }

    pub fn with_c(mut self, c: f32) -> Self {
        self.c = c;
        self
    }
}

/// Game event kinds (Rust → host).
pub mod events {
    pub const IDENTITY_ACCEPTED: f32 = 1.0;
    /// a = error generation
    pub const IDENTITY_REJECTED: f32 = 2.0;
    /// a = new stage index, b = previous stage index
    pub const STAGE_CHANGED: f32 = 3.0;
    /// a = stage index
    pub const PUZZLE_COMPLETE: f32 = 4.0;
    /// a = location id, b = clicked count after the click, c = total locations
    pub const LOCATION_ACCEPTED: f32 = 5.0;
    /// a = location id
    pub const LOCATION_REJECTED: f32 = 6.0;
    /// a = wheel index, b = new digit
    pub const WHEEL_CHANGED: f32 = 7.0;
    /// a = attempt count, b = matching wheels
    pub const CODE_CHECKED: f32 = 8.0;
    pub const LOCK_OPENED: f32 = 9.0;
    pub const HINT_SHOWN: f32 = 10.0;
    /// a = letter code point, b = guessed letters, c = required letters
    pub const LETTER_HIT: f32 = 11.0;
    /// a = letter code point, b = lives remaining (0 right before a reset)
    pub const LETTER_MISS: f32 = 12.0;
    pub const PHRASE_RESET: f32 = 13.0;
    /// a = star index
    pub const STAR_ARMED: f32 = 14.0;
    /// a = star index
    pub const STAR_DISARMED: f32 = 15.0;
    /// a = found edges, b = target edges
    pub const EDGE_FOUND: f32 = 16.0;
    /// a, b = star indices
    pub const EDGE_REJECTED: f32 = 17.0;
    /// a = click count
    pub const SEAL_CRACKED: f32 = 18.0;
    pub const SEAL_OPENED: f32 = 19.0;
    pub const DEBUG_UNLOCKED: f32 = 20.0;
    /// a = sequence id
    pub const SEQUENCE_DONE: f32 = 21.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_linear_and_terminal() {
        let mut stage = StageKind::Intro;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }
        assert_eq!(visited, StageKind::ALL.to_vec());
        assert_eq!(StageKind::Conclusion.next(), None);
    }

    #[test]
    fn stage_index_round_trips() {
        for stage in StageKind::ALL {
            assert_eq!(StageKind::from_index(stage.index()), Some(stage));
        }
        assert_eq!(StageKind::from_index(5), None);
    }

    #[test]
    fn game_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
        let batch = [GameEvent::new(events::LOCK_OPENED).with_a(2.0)];
        let floats: &[f32] = bytemuck::cast_slice(&batch);
        assert_eq!(floats, &[events::LOCK_OPENED, 2.0, 0.0, 0.0]);
    }
}
