use serde::Serialize;
use thiserror::Error;

use crate::api::config::ExperienceConfig;
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, StageKind};
use crate::core::session::{SessionStore, DEBUG_UNLOCKED_KEY};
use crate::extensions::tween::{AnimatedValue, Timeline};
use crate::input::event::InputEvent;
use crate::puzzles::identity::{IdentityGate, VisitorIdentity};
use crate::stages::{self, StageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JumpError {
    #[error("debug mode is locked, cannot jump to {0:?}")]
    Locked(StageKind),
}

/// Everything the host needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceView {
    pub stage: StageKind,
    pub visitor_name: Option<String>,
    pub debug_unlocked: bool,
    /// The active riddle is solved and `Continue` will advance.
    pub stage_complete: bool,
    pub animations: Vec<AnimatedValue>,
    pub screen: StageView,
}

/// Single writer of the current stage.
///
/// Owns the session store, the active stage screen and the animation
/// timeline. Screens report outcomes; only the controller changes stage
/// or touches the debug flag.
pub struct StageController<S: SessionStore> {
    config: ExperienceConfig,
    store: S,
    stage: StageKind,
    screen: Box<dyn StageScreen>,
    visitor: Option<VisitorIdentity>,
    stage_complete: bool,
    debug_unlocked: bool,
    events: Vec<GameEvent>,
    timeline: Timeline,
}

impl<S: SessionStore> StageController<S> {
    /// Build the controller, silently resuming a returning visitor.
    pub fn new(config: ExperienceConfig, store: S) -> Self {
        let visitor = IdentityGate::new(&config.accepted_name).resume(&store);
        let debug_unlocked = store.get(DEBUG_UNLOCKED_KEY).as_deref() == Some("true");
        let stage = match &visitor {
            Some(_) if config.auto_advance_on_resume => StageKind::Riddle1,
            _ => StageKind::Intro,
        };
        log::info!(
            "controller: starting at {:?} (resumed: {}, debug: {})",
            stage,
            visitor.is_some(),
            debug_unlocked
        );

        let screen = stages::build(stage, &config, visitor.as_ref());
        let mut controller = Self {
            config,
            store,
            stage,
            screen,
            visitor,
            stage_complete: false,
            debug_unlocked,
            events: Vec::new(),
            timeline: Timeline::new(),
        };
        controller.dispatch(|screen, ctx| screen.enter(ctx));
        controller
    }

    pub fn stage(&self) -> StageKind {
        self.stage
    }

    pub fn visitor(&self) -> Option<&VisitorIdentity> {
        self.visitor.as_ref()
    }

    pub fn is_stage_complete(&self) -> bool {
        self.stage_complete
    }

    pub fn debug_unlocked(&self) -> bool {
        self.debug_unlocked
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Move to the next stage. A no-op on the terminal stage.
    pub fn advance(&mut self) {
        match self.stage.next() {
            Some(next) => self.enter_stage(next),
            None => log::debug!("controller: advance ignored at {:?}", self.stage),
        }
    }

    /// Debug tools: jump to any stage without re-validating puzzles.
    pub fn jump_to(&mut self, stage: StageKind) -> Result<(), JumpError> {
        if !self.debug_unlocked {
            log::warn!("controller: jump to {:?} refused, debug mode locked", stage);
            return Err(JumpError::Locked(stage));
        }
        log::info!("controller: debug jump to {:?}", stage);
        self.enter_stage(stage);
        Ok(())
    }

    /// Handle one input event to completion.
    pub fn handle(&mut self, input: InputEvent) {
        match input {
            InputEvent::Continue => {
                if self.stage_complete {
                    self.advance();
                } else {
                    log::debug!("controller: continue ignored, {:?} not complete", self.stage);
                }
            }
            InputEvent::JumpTo(stage) => {
                // Refusal is already logged.
                let _ = self.jump_to(stage);
            }
            input if input.targets(self.stage) => {
                self.dispatch(|screen, ctx| screen.handle(&input, ctx));
            }
            input => log::debug!("controller: {:?} ignored on {:?}", input, self.stage),
        }
    }

    /// Advance transient state and animations by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.dispatch(|screen, ctx| screen.tick(dt, ctx));
        self.timeline.tick(dt);
        for (id, name) in self.timeline.drain_completed() {
            self.events.push(GameEvent::new(events::SEQUENCE_DONE).with_a(id.0 as f32));
            self.dispatch(|screen, ctx| screen.on_sequence_complete(&name, ctx));
        }
    }

    pub fn view(&self) -> ExperienceView {
        ExperienceView {
            stage: self.stage,
            visitor_name: self.visitor.as_ref().map(|v| v.name.clone()),
            debug_unlocked: self.debug_unlocked,
            stage_complete: self.stage_complete,
            animations: self.timeline.values(),
            screen: self.screen.view(),
        }
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn dispatch<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn StageScreen, &mut StageContext),
    {
        let outcome = {
            let mut ctx = StageContext::new(&mut self.store, &mut self.events, &mut self.timeline);
            f(self.screen.as_mut(), &mut ctx);
            ctx.take_outcome()
        };
        if let Some(outcome) = outcome {
            self.on_outcome(outcome);
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Identity(visitor) => {
                self.visitor = Some(visitor);
                if self.stage == StageKind::Intro {
                    self.advance();
                }
            }
            Outcome::Solved => {
                log::info!("controller: {:?} solved", self.stage);
                self.stage_complete = true;
                self.events
                    .push(GameEvent::new(events::PUZZLE_COMPLETE).with_a(self.stage.index() as f32));
            }
            Outcome::SealOpened => {
                self.stage_complete = true;
                self.unlock_debug();
            }
        }
    }

    fn unlock_debug(&mut self) {
        if let Err(err) = self.store.set(DEBUG_UNLOCKED_KEY, "true") {
            log::warn!("controller: could not persist debug flag: {}", err);
        }
        if !self.debug_unlocked {
            log::info!("controller: debug mode unlocked");
            self.debug_unlocked = true;
            self.events.push(GameEvent::new(events::DEBUG_UNLOCKED));
        }
    }

    fn enter_stage(&mut self, stage: StageKind) {
        let previous = self.stage;
        log::info!("controller: {:?} -> {:?}", previous, stage);

        self.timeline.clear();
        self.stage = stage;
        self.stage_complete = false;
        self.screen = stages::build(stage, &self.config, self.visitor.as_ref());
        self.events.push(
            GameEvent::new(events::STAGE_CHANGED)
                .with_a(stage.index() as f32)
                .with_b(previous.index() as f32),
        );
        self.dispatch(|screen, ctx| screen.enter(ctx));
    }
}
