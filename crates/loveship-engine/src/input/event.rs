use crate::api::types::{LocationId, StageKind, StarId};

/// Input events the experience understands.
/// The host translates DOM interactions into these and feeds them one at a
/// time; each is handled to completion before the call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The name form was submitted with this raw text.
    SubmitName(String),
    /// The visitor typed in the name field (clears a shown error).
    NameEdited,
    /// A map marker was clicked.
    ClickLocation(LocationId),
    /// A lock wheel arrow was pressed. `delta` is usually +1 or -1.
    TurnWheel { index: usize, delta: i32 },
    /// The "unlock" button was pressed.
    CheckCode,
    /// A key of the on-screen keyboard was pressed.
    GuessLetter(char),
    /// A star was clicked (or activated with Enter/Space).
    SelectStar(StarId),
    /// The wax seal was clicked.
    CrackSeal,
    /// The "continue" button of a solved stage was pressed.
    Continue,
    /// Debug tools: jump straight to a stage.
    JumpTo(StageKind),
}

impl InputEvent {
    /// Whether this event only makes sense on the given stage.
    pub fn targets(&self, stage: StageKind) -> bool {
        match self {
            InputEvent::SubmitName(_) | InputEvent::NameEdited => stage == StageKind::Intro,
            InputEvent::ClickLocation(_) => stage == StageKind::Riddle1,
            InputEvent::TurnWheel { .. } | InputEvent::CheckCode | InputEvent::GuessLetter(_) => {
                stage == StageKind::Riddle2
            }
            InputEvent::SelectStar(_) => stage == StageKind::Riddle3,
            InputEvent::CrackSeal => stage == StageKind::Conclusion,
            InputEvent::Continue | InputEvent::JumpTo(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_inputs_target_their_stage() {
        assert!(InputEvent::ClickLocation(LocationId(7)).targets(StageKind::Riddle1));
        assert!(!InputEvent::ClickLocation(LocationId(7)).targets(StageKind::Riddle2));
        assert!(InputEvent::GuessLetter('a').targets(StageKind::Riddle2));
        assert!(!InputEvent::CrackSeal.targets(StageKind::Intro));
    }

    #[test]
    fn navigation_inputs_target_every_stage() {
        for stage in StageKind::ALL {
            assert!(InputEvent::Continue.targets(stage));
            assert!(InputEvent::JumpTo(StageKind::Riddle3).targets(stage));
        }
    }
}
