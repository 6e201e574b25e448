use serde::Serialize;

use crate::api::config::ExperienceConfig;
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, StageKind};
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::input::event::InputEvent;
use crate::puzzles::identity::{GateOutcome, IdentityGate, VisitorIdentity};

use super::{rise_in, shake, stage_fade_in, StageView, ENTER_SEQUENCE, STAGE_TARGET};

pub const ERROR_TARGET: &str = "intro-error";
pub const WELCOME_TARGET: &str = "welcome";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntroView {
    pub title: String,
    /// Current content of the name field (pre-filled on return visits).
    pub name: String,
    /// The rejection message is up until the visitor edits the name.
    pub error: bool,
    /// Bumped on every rejection so the host can replay the shake.
    pub error_generation: u32,
    pub accepted: bool,
}

/// Name prompt in front of the whole experience.
#[derive(Debug)]
pub struct IntroScreen {
    gate: IdentityGate,
    title: String,
    name: String,
    error: bool,
    error_generation: u32,
    accepted: bool,
}

impl IntroScreen {
    pub fn new(config: &ExperienceConfig, visitor: Option<&VisitorIdentity>) -> Self {
        Self {
            gate: IdentityGate::new(&config.accepted_name),
            title: config.intro_title.clone(),
            name: visitor.map(|v| v.name.clone()).unwrap_or_default(),
            error: false,
            error_generation: 0,
            accepted: false,
        }
    }

    fn submit(&mut self, raw: &str, ctx: &mut StageContext) {
        if self.accepted {
            return;
        }
        if raw.trim().is_empty() {
            log::debug!("intro: ignoring blank name");
            return;
        }
        self.name = raw.to_string();

        match self.gate.submit(raw, &mut *ctx.store) {
            GateOutcome::Accepted(visitor) => {
                self.accepted = true;
                self.error = false;
                ctx.emit_event(GameEvent::new(events::IDENTITY_ACCEPTED));
                ctx.animate(Sequence::new("welcome").then(rise_in(WELCOME_TARGET, 20.0, 0.8)));
                ctx.complete(Outcome::Identity(visitor));
            }
            GateOutcome::Rejected => {
                self.error = true;
                self.error_generation += 1;
                ctx.emit_event(
                    GameEvent::new(events::IDENTITY_REJECTED).with_a(self.error_generation as f32),
                );
                ctx.animate(shake("identity-error", ERROR_TARGET, 10.0, 0.1, 5));
            }
        }
    }
}

impl StageScreen for IntroScreen {
    fn kind(&self) -> StageKind {
        StageKind::Intro
    }

    fn enter(&mut self, ctx: &mut StageContext) {
        ctx.animate(Sequence::new(ENTER_SEQUENCE).then(Step::new(vec![
            stage_fade_in(),
            Tween::from_to(STAGE_TARGET, Property::Y, 30.0, 0.0, 1.0).with_easing(Easing::CubicOut),
        ])));
    }

    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext) {
        match input {
            InputEvent::SubmitName(raw) => self.submit(raw, ctx),
            InputEvent::NameEdited => self.error = false,
            _ => {}
        }
    }

    fn view(&self) -> StageView {
        StageView::Intro(IntroView {
            title: self.title.clone(),
            name: self.name.clone(),
            error: self.error,
            error_generation: self.error_generation,
            accepted: self.accepted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{MemoryStore, SessionStore, VISITOR_NAME_KEY};
    use crate::extensions::tween::Timeline;

    struct Harness {
        store: MemoryStore,
        events: Vec<GameEvent>,
        timeline: Timeline,
    }

    impl Harness {
        fn new() -> Self {
            Self { store: MemoryStore::new(), events: Vec::new(), timeline: Timeline::new() }
        }

        fn send(&mut self, screen: &mut IntroScreen, input: InputEvent) -> Option<Outcome> {
            let mut ctx = StageContext::new(&mut self.store, &mut self.events, &mut self.timeline);
            screen.handle(&input, &mut ctx);
            ctx.take_outcome()
        }
    }

    fn intro_view(screen: &IntroScreen) -> IntroView {
        match screen.view() {
            StageView::Intro(view) => view,
            other => panic!("expected intro view, got {:?}", other),
        }
    }

    #[test]
    fn accepted_name_reports_identity_and_persists_raw_text() {
        let mut h = Harness::new();
        let mut screen = IntroScreen::new(&ExperienceConfig::default(), None);

        let outcome = h.send(&mut screen, InputEvent::SubmitName("  Victoria ".into()));
        match outcome {
            Some(Outcome::Identity(visitor)) => {
                assert_eq!(visitor.name, "  Victoria ");
                assert!(!visitor.resume_enabled);
            }
            other => panic!("expected identity outcome, got {:?}", other),
        }
        assert_eq!(h.store.get(VISITOR_NAME_KEY).as_deref(), Some("  Victoria "));
        assert_eq!(h.events[0].kind, events::IDENTITY_ACCEPTED);
        assert!(intro_view(&screen).accepted);
    }

    #[test]
    fn rejection_shows_error_until_name_is_edited() {
        let mut h = Harness::new();
        let mut screen = IntroScreen::new(&ExperienceConfig::default(), None);

        assert_eq!(h.send(&mut screen, InputEvent::SubmitName("Alice".into())), None);
        assert_eq!(h.send(&mut screen, InputEvent::SubmitName("Bob".into())), None);
        let view = intro_view(&screen);
        assert!(view.error);
        assert_eq!(view.error_generation, 2);
        assert!(h.store.is_empty());
        assert!(h.timeline.is_running("identity-error"));

        h.send(&mut screen, InputEvent::NameEdited);
        assert!(!intro_view(&screen).error);
    }

    #[test]
    fn blank_name_is_ignored() {
        let mut h = Harness::new();
        let mut screen = IntroScreen::new(&ExperienceConfig::default(), None);
        assert_eq!(h.send(&mut screen, InputEvent::SubmitName("   ".into())), None);
        assert!(!intro_view(&screen).error);
        assert!(h.events.is_empty());
    }

    #[test]
    fn returning_visitor_sees_prefilled_name() {
        let visitor = VisitorIdentity { name: "VICTORIA".into(), resume_enabled: true };
        let screen = IntroScreen::new(&ExperienceConfig::default(), Some(&visitor));
        assert_eq!(intro_view(&screen).name, "VICTORIA");
    }
}
