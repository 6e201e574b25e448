use serde::Serialize;

use crate::api::config::ExperienceConfig;
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, StageKind};
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::input::event::InputEvent;
use crate::puzzles::seal::{SealOutcome, WaxSeal};

use super::{stage_fade_in, StageView, ENTER_SEQUENCE};

pub const SEAL_TARGET: &str = "seal";
pub const ENVELOPE_TARGET: &str = "envelope";
pub const LETTER_TARGET: &str = "letter";
/// Name of the sequence that breaks the seal and unfolds the letter.
pub const OPEN_LETTER_SEQUENCE: &str = "open-letter";

pub fn letter_line_target(index: usize) -> String {
    format!("letter-line:{}", index)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConclusionView {
    pub clicks: u32,
    pub required: u32,
    pub open: bool,
    /// Letter paragraphs, present once the seal is broken.
    pub letter: Option<Vec<String>>,
    pub letter_revealed: bool,
}

/// The closing screen: a sealed letter that opens after a few clicks.
#[derive(Debug)]
pub struct ConclusionScreen {
    seal: WaxSeal,
    required: u32,
    letter: Vec<String>,
    letter_revealed: bool,
}

impl ConclusionScreen {
    pub fn new(config: &ExperienceConfig) -> Self {
        Self {
            seal: WaxSeal::new(config.seal_clicks),
            required: config.seal_clicks,
            letter: config
                .letter
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            letter_revealed: false,
        }
    }

    pub fn seal(&self) -> &WaxSeal {
        &self.seal
    }

    fn crack(&mut self, ctx: &mut StageContext) {
        match self.seal.crack() {
            SealOutcome::Ignored => {}
            SealOutcome::Cracked(clicks) => {
                ctx.emit_event(GameEvent::new(events::SEAL_CRACKED).with_a(clicks as f32));
                ctx.animate(Sequence::new("seal-crack").then(Step::new(vec![
                    Tween::to(SEAL_TARGET, Property::Scale, 1.0 + clicks as f32 * 0.1, 0.2)
                        .with_easing(Easing::POP),
                    Tween::to(SEAL_TARGET, Property::Rotation, clicks as f32 * 15.0, 0.2)
                        .with_easing(Easing::POP),
                ])));
            }
            SealOutcome::Opened => {
                log::info!("conclusion: seal opened");
                ctx.emit_event(
                    GameEvent::new(events::SEAL_CRACKED).with_a(self.seal.clicks() as f32),
                );
                ctx.emit_event(GameEvent::new(events::SEAL_OPENED));
                ctx.timeline.kill_target(SEAL_TARGET);
                ctx.animate(self.open_sequence());
                ctx.complete(Outcome::SealOpened);
            }
        }
    }

    fn open_sequence(&self) -> Sequence {
        let lines = Step::stagger((0..self.letter.len()).map(letter_line_target), 0.15, |target| {
            Tween::from_to(target, Property::Opacity, 0.0, 1.0, 0.4)
        })
        .join(Step::stagger((0..self.letter.len()).map(letter_line_target), 0.15, |target| {
            Tween::from_to(target, Property::Y, 10.0, 0.0, 0.4)
        }));

        Sequence::new(OPEN_LETTER_SEQUENCE)
            .then(Step::new(vec![
                Tween::to(SEAL_TARGET, Property::Scale, 0.0, 0.5).with_easing(Easing::CubicIn),
                Tween::to(SEAL_TARGET, Property::Opacity, 0.0, 0.5).with_easing(Easing::CubicIn),
                Tween::to(SEAL_TARGET, Property::Rotation, 180.0, 0.5).with_easing(Easing::CubicIn),
            ]))
            .then(Step::new(vec![
                Tween::to(ENVELOPE_TARGET, Property::Opacity, 0.0, 0.5),
                Tween::from_to(LETTER_TARGET, Property::Opacity, 0.0, 1.0, 0.8)
                    .with_easing(Easing::CubicIn)
                    .with_delay(0.1),
            ]))
            .then(lines)
    }
}

impl StageScreen for ConclusionScreen {
    fn kind(&self) -> StageKind {
        StageKind::Conclusion
    }

    fn enter(&mut self, ctx: &mut StageContext) {
        ctx.animate(Sequence::new(ENTER_SEQUENCE).then(Step::single(stage_fade_in())));
        ctx.animate(Sequence::new("seal-pulse").then(Step::single(
            Tween::from_to(SEAL_TARGET, Property::Scale, 1.0, 1.05, 1.5)
                .with_easing(Easing::SineInOut)
                .forever()
                .yoyo(),
        )));
    }

    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext) {
        if let InputEvent::CrackSeal = input {
            self.crack(ctx);
        }
    }

    fn on_sequence_complete(&mut self, name: &str, _ctx: &mut StageContext) {
        if name == OPEN_LETTER_SEQUENCE {
            self.letter_revealed = true;
        }
    }

    fn view(&self) -> StageView {
        let open = self.seal.is_open();
        StageView::Conclusion(ConclusionView {
            clicks: self.seal.clicks(),
            required: self.required,
            open,
            letter: open.then(|| self.letter.clone()),
            letter_revealed: self.letter_revealed,
        })
    }
}
