use crate::api::types::{GameEvent, StageKind};
use crate::core::session::SessionStore;
use crate::extensions::tween::{Sequence, SequenceId, Timeline};
use crate::input::event::InputEvent;
use crate::puzzles::identity::VisitorIdentity;
use crate::stages::StageView;

/// What a stage reports back to the controller when its puzzle is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The identity gate let the visitor in.
    Identity(VisitorIdentity),
    /// The stage's puzzle is solved; the visitor may continue.
    Solved,
    /// The wax seal broke and the letter is revealed.
    SealOpened,
}

/// The contract every stage screen fulfills.
///
/// A screen pairs one puzzle engine with its presentation state. It never
/// changes stage itself; it reports an [`Outcome`] and the controller decides.
pub trait StageScreen {
    fn kind(&self) -> StageKind;

    /// Called once when the stage becomes active. Queue entrance animations here.
    fn enter(&mut self, _ctx: &mut StageContext) {}

    /// Handle one input event to completion.
    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext);

    /// Advance transient presentation state (flashes, pulses).
    fn tick(&mut self, _dt: f32, _ctx: &mut StageContext) {}

    /// A sequence this stage queued has finished playing.
    fn on_sequence_complete(&mut self, _name: &str, _ctx: &mut StageContext) {}

    /// Plain derived values for the host renderer.
    fn view(&self) -> StageView;
}

/// Mutable access to the shared services, passed to every [`StageScreen`] call.
pub struct StageContext<'a> {
    pub store: &'a mut dyn SessionStore,
    pub events: &'a mut Vec<GameEvent>,
    pub timeline: &'a mut Timeline,
    outcome: Option<Outcome>,
}

impl<'a> StageContext<'a> {
    pub fn new(
        store: &'a mut dyn SessionStore,
        events: &'a mut Vec<GameEvent>,
        timeline: &'a mut Timeline,
    ) -> Self {
        Self {
            store,
            events,
            timeline,
            outcome: None,
        }
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue an animation sequence. Never blocks input.
    pub fn animate(&mut self, sequence: Sequence) -> SequenceId {
        self.timeline.add(sequence)
    }

    /// Report the stage's outcome. The last report of a call wins.
    pub fn complete(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }
}
