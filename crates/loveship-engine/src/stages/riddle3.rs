use glam::Vec2;
use serde::Serialize;

use crate::api::config::{ExperienceConfig, Star};
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, StageKind, StarId};
use crate::core::timer::Transient;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::input::event::InputEvent;
use crate::puzzles::constellation::{Constellation, EdgeKey, SelectOutcome};

use super::{rise_in, shake, stage_fade_in, StageView, ENTER_SEQUENCE};

pub const SUCCESS_TARGET: &str = "success-msg";

pub fn star_target(id: &StarId) -> String {
    format!("star:{}", id)
}

pub fn line_target(edge: &EdgeKey) -> String {
    format!("line:{}", edge)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarView {
    pub id: StarId,
    pub name: String,
    pub position: Vec2,
    pub selected: bool,
    /// Part of a wrong connection that is still being shown.
    pub rejected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub key: EdgeKey,
    pub from: Vec2,
    pub to: Vec2,
    /// Used as the dash array when the line draws itself.
    pub length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationView {
    pub stars: Vec<StarView>,
    pub lines: Vec<LineView>,
    pub found: usize,
    pub total: usize,
    pub complete: bool,
}

/// Riddle 3: draw Orion by connecting pairs of stars.
#[derive(Debug)]
pub struct ConstellationScreen {
    puzzle: Constellation,
    stars: Vec<Star>,
    rejected: Transient<(StarId, StarId)>,
    reject_secs: f32,
}

impl ConstellationScreen {
    pub fn new(config: &ExperienceConfig) -> Self {
        Self {
            puzzle: Constellation::new(
                config.stars.iter().map(|s| &s.id),
                config.constellation_edges.iter(),
            ),
            stars: config.stars.clone(),
            rejected: Transient::new(),
            reject_secs: config.star_reject_secs,
        }
    }

    pub fn puzzle(&self) -> &Constellation {
        &self.puzzle
    }

    fn position(&self, id: &StarId) -> Option<Vec2> {
        self.stars.iter().find(|s| &s.id == id).map(|s| s.pos)
    }

    fn index(&self, id: &StarId) -> f32 {
        self.stars
            .iter()
            .position(|s| &s.id == id)
            .map_or(-1.0, |i| i as f32)
    }

    fn settle(target: String, delay: f32) -> Tween {
        Tween::to(target, Property::Scale, 1.0, 0.3).with_delay(delay)
    }

    fn select(&mut self, id: &StarId, ctx: &mut StageContext) {
        let armed = self.puzzle.selected().cloned();

        match self.puzzle.select(id) {
            SelectOutcome::Ignored => {}
            SelectOutcome::Armed(star) => {
                ctx.emit_event(GameEvent::new(events::STAR_ARMED).with_a(self.index(&star)));
                ctx.animate(Sequence::new("star-arm").then(Step::single(
                    Tween::to(star_target(&star), Property::Scale, 1.4, 0.3).with_easing(Easing::POP),
                )));
            }
            SelectOutcome::Disarmed(star) => {
                ctx.emit_event(GameEvent::new(events::STAR_DISARMED).with_a(self.index(&star)));
                ctx.animate(
                    Sequence::new("star-disarm")
                        .then(Step::single(Self::settle(star_target(&star), 0.0))),
                );
            }
            SelectOutcome::AlreadyFound(edge) => {
                log::debug!("riddle3: {} already connected", edge);
                if let Some(star) = armed {
                    ctx.emit_event(GameEvent::new(events::STAR_DISARMED).with_a(self.index(&star)));
                    ctx.animate(
                        Sequence::new("star-disarm")
                            .then(Step::single(Self::settle(star_target(&star), 0.0))),
                    );
                }
            }
            SelectOutcome::Found { edge, found, complete } => {
                log::debug!("riddle3: found {} ({}/{})", edge, found, self.puzzle.target_count());
                ctx.emit_event(
                    GameEvent::new(events::EDGE_FOUND)
                        .with_a(found as f32)
                        .with_b(self.puzzle.target_count() as f32),
                );

                let length = self.edge_length(&edge);
                let mut step = Step::new(vec![
                    Tween::from_to(line_target(&edge), Property::DashOffset, length, 0.0, 0.6),
                    Tween::from_to(star_target(id), Property::Scale, 1.0, 1.3, 0.2)
                        .with_easing(Easing::POP)
                        .repeat(1)
                        .yoyo(),
                ]);
                if let Some(star) = &armed {
                    step = step.and(Self::settle(star_target(star), 0.0));
                }
                ctx.animate(Sequence::new("edge-found").then(step));

                if complete {
                    log::info!("riddle3: constellation complete");
                    ctx.animate(self.celebration());
                    ctx.complete(Outcome::Solved);
                }
            }
            SelectOutcome::Rejected(a, b) => {
                log::debug!("riddle3: {}-{} is not part of the constellation", a, b);
                ctx.emit_event(
                    GameEvent::new(events::EDGE_REJECTED)
                        .with_a(self.index(&a))
                        .with_b(self.index(&b)),
                );
                for star in [&a, &b] {
                    ctx.animate(shake("star-reject", &star_target(star), 4.0, 0.08, 4));
                }
                ctx.animate(
                    Sequence::new("star-disarm").then(Step::single(Self::settle(star_target(&a), 0.4))),
                );
                self.rejected.show((a, b), self.reject_secs);
            }
        }
    }

    fn edge_length(&self, edge: &EdgeKey) -> f32 {
        self.puzzle
            .found_endpoints()
            .find(|(key, _, _)| *key == edge)
            .and_then(|(_, a, b)| Some(self.position(a)?.distance(self.position(b)?)))
            .unwrap_or(200.0)
    }

    /// Every line brightens and the success message rises in.
    fn celebration(&self) -> Sequence {
        let lines = self.puzzle.found().iter().map(line_target);
        let glow = Step::stagger(lines, 0.0, |target| {
            Tween::to(target, Property::StrokeWidth, 3.0, 0.8)
        });
        let message = rise_in(SUCCESS_TARGET, 16.0, 0.8);
        let message = Step::new(
            message
                .tweens()
                .iter()
                .cloned()
                .map(|t| t.with_delay(0.5))
                .collect(),
        );
        Sequence::new("constellation-complete")
            .then(Step::pause(0.3))
            .then(glow.join(message))
    }
}

impl StageScreen for ConstellationScreen {
    fn kind(&self) -> StageKind {
        StageKind::Riddle3
    }

    fn enter(&mut self, ctx: &mut StageContext) {
        let stars: Vec<String> = self.stars.iter().map(|s| star_target(&s.id)).collect();
        let pop = Step::stagger(stars.iter().cloned(), 0.08, |target| {
            Tween::from_to(target, Property::Scale, 0.0, 1.0, 0.6)
                .with_easing(Easing::POP)
                .with_delay(0.5)
        });
        let fade = Step::stagger(stars.into_iter(), 0.08, |target| {
            Tween::from_to(target, Property::Opacity, 0.0, 1.0, 0.6).with_delay(0.5)
        });
        ctx.animate(
            Sequence::new(ENTER_SEQUENCE).then(Step::single(stage_fade_in()).join(pop).join(fade)),
        );
    }

    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext) {
        if let InputEvent::SelectStar(id) = input {
            self.select(id, ctx);
        }
    }

    fn tick(&mut self, dt: f32, _ctx: &mut StageContext) {
        self.rejected.tick(dt);
    }

    fn view(&self) -> StageView {
        let selected = self.puzzle.selected();
        let rejected = self.rejected.get();
        let stars = self
            .stars
            .iter()
            .map(|s| StarView {
                id: s.id.clone(),
                name: s.name.clone(),
                position: s.pos,
                selected: selected == Some(&s.id),
                rejected: rejected.is_some_and(|(a, b)| a == &s.id || b == &s.id),
            })
            .collect();

        let lines = self
            .puzzle
            .found_endpoints()
            .filter_map(|(key, a, b)| {
                let from = self.position(a)?;
                let to = self.position(b)?;
                Some(LineView { key: key.clone(), from, to, length: from.distance(to) })
            })
            .collect();

        StageView::Riddle3(ConstellationView {
            stars,
            lines,
            found: self.puzzle.found_count(),
            total: self.puzzle.target_count(),
            complete: self.puzzle.is_complete(),
        })
    }
}
