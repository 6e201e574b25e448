// stages/mod.rs
//
// One screen per stage. Each screen owns a puzzle engine plus the
// presentation state around it (flashes, pulses, animation requests) and
// renders a serializable view. Dropping a screen drops only presentation.

pub mod conclusion;
pub mod intro;
pub mod riddle1;
pub mod riddle2;
pub mod riddle3;

use serde::Serialize;

use crate::api::config::ExperienceConfig;
use crate::api::stage::StageScreen;
use crate::api::types::StageKind;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::puzzles::identity::VisitorIdentity;

pub use conclusion::{ConclusionScreen, ConclusionView};
pub use intro::{IntroScreen, IntroView};
pub use riddle1::{LocationsScreen, LocationsView};
pub use riddle2::{LockScreen, LockView};
pub use riddle3::{ConstellationScreen, ConstellationView};

/// Element key of the stage container.
pub const STAGE_TARGET: &str = "stage";
/// Name of the sequence every stage plays when it becomes active.
pub const ENTER_SEQUENCE: &str = "enter";

/// Per-stage view, tagged with the stage it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageView {
    Intro(IntroView),
    Riddle1(LocationsView),
    Riddle2(LockView),
    Riddle3(ConstellationView),
    Conclusion(ConclusionView),
}

impl StageView {
    pub fn kind(&self) -> StageKind {
        match self {
            StageView::Intro(_) => StageKind::Intro,
            StageView::Riddle1(_) => StageKind::Riddle1,
            StageView::Riddle2(_) => StageKind::Riddle2,
            StageView::Riddle3(_) => StageKind::Riddle3,
            StageView::Conclusion(_) => StageKind::Conclusion,
        }
    }
}

/// Build a fresh screen for `kind`.
pub fn build(
    kind: StageKind,
    config: &ExperienceConfig,
    visitor: Option<&VisitorIdentity>,
) -> Box<dyn StageScreen> {
    match kind {
        StageKind::Intro => Box::new(IntroScreen::new(config, visitor)),
        StageKind::Riddle1 => Box::new(LocationsScreen::new(config)),
        StageKind::Riddle2 => Box::new(LockScreen::new(config)),
        StageKind::Riddle3 => Box::new(ConstellationScreen::new(config)),
        StageKind::Conclusion => Box::new(ConclusionScreen::new(config)),
    }
}

/// The container fade every entrance starts with.
pub(crate) fn stage_fade_in() -> Tween {
    Tween::from_to(STAGE_TARGET, Property::Opacity, 0.0, 1.0, 1.0).with_easing(Easing::CubicOut)
}

/// Shake `target` sideways, then put it back at rest.
pub(crate) fn shake(name: &str, target: &str, offset: f32, duration: f32, repeats: u32) -> Sequence {
    Sequence::new(name)
        .then(Step::single(Tween::shake(target, offset, duration, repeats)))
        .then(Step::single(Tween::from_to(target, Property::X, 0.0, 0.0, 0.0)))
}

/// Fade a message in while it slides up into place.
pub(crate) fn rise_in(target: &str, rise: f32, duration: f32) -> Step {
    Step::new(vec![
        Tween::from_to(target, Property::Opacity, 0.0, 1.0, duration),
        Tween::from_to(target, Property::Y, rise, 0.0, duration),
    ])
}
