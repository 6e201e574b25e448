use loveship_engine::{
    ExperienceConfig, ExperienceView, GameEvent, InputEvent, JumpError, SessionStore, StageController,
    StageKind,
};

/// Wires the stage controller to the browser frame loop.
///
/// The wasm exports hold one `thread_local!` runner because wasm-bindgen
/// cannot export generic structs directly. Inputs are handled as they
/// arrive; events they emit are published on the next `tick`.
pub struct ExperienceRunner<S: SessionStore> {
    controller: StageController<S>,
    /// Flat `[kind, a, b, c]` records of the last tick, read by the host.
    event_buffer: Vec<f32>,
}

impl<S: SessionStore> ExperienceRunner<S> {
    pub fn new(config: ExperienceConfig, store: S) -> Self {
        Self {
            controller: StageController::new(config, store),
            event_buffer: Vec::new(),
        }
    }

    pub fn handle(&mut self, input: InputEvent) {
        self.controller.handle(input);
    }

    pub fn jump_to(&mut self, stage: StageKind) -> Result<(), JumpError> {
        self.controller.jump_to(stage)
    }

    /// Advance the frame and publish every event emitted since the last tick.
    pub fn tick(&mut self, dt: f32) {
        self.controller.tick(dt);
        let events = self.controller.drain_events();
        self.event_buffer.clear();
        self.event_buffer.extend_from_slice(bytemuck::cast_slice(&events));
    }

    pub fn stage(&self) -> StageKind {
        self.controller.stage()
    }

    pub fn view(&self) -> ExperienceView {
        self.controller.view()
    }

    pub fn view_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.controller.view())
    }

    // ---- Pointer accessors for the host's event reads ----

    pub fn events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr()
    }

    /// Number of events (not floats) in the buffer.
    pub fn events_len(&self) -> u32 {
        (self.event_buffer.len() / GameEvent::FLOATS) as u32
    }

    pub fn event_floats(&self) -> &[f32] {
        &self.event_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loveship_engine::{events, LocationId, MemoryStore};

    fn runner() -> ExperienceRunner<MemoryStore> {
        ExperienceRunner::new(ExperienceConfig::default(), MemoryStore::new())
    }

    #[test]
    fn events_are_published_on_tick() {
        let mut r = runner();
        r.handle(InputEvent::SubmitName("Victoria".into()));
        assert_eq!(r.events_len(), 0);

        r.tick(1.0 / 60.0);
        assert_eq!(r.stage(), StageKind::Riddle1);
        assert_eq!(r.events_len(), 2);
        assert_eq!(r.event_floats()[0], events::IDENTITY_ACCEPTED);
        assert_eq!(r.event_floats()[4], events::STAGE_CHANGED);
        assert_eq!(r.event_floats()[5], StageKind::Riddle1.index() as f32);

        r.tick(1.0 / 60.0);
        assert_eq!(r.events_len(), 0);
    }

    #[test]
    fn view_serializes_for_the_host() {
        let mut r = runner();
        r.handle(InputEvent::SubmitName("victoria".into()));
        r.handle(InputEvent::ClickLocation(LocationId(7)));

        let json: serde_json::Value = serde_json::from_str(&r.view_json().unwrap()).unwrap();
        assert_eq!(json["stage"], "riddle1");
        assert_eq!(json["screen"]["stage"], "riddle1");
        assert_eq!(json["screen"]["step"], 1);
        assert_eq!(json["visitor_name"], "victoria");
    }

    #[test]
    fn locked_jump_is_refused() {
        let mut r = runner();
        assert!(r.jump_to(StageKind::Conclusion).is_err());
        assert_eq!(r.view().stage, StageKind::Intro);
    }
}
