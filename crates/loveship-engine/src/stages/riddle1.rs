use glam::DVec2;
use serde::Serialize;

use crate::api::config::{ExperienceConfig, Location, Zone};
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, LocationId, StageKind};
use crate::core::timer::Transient;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::input::event::InputEvent;
use crate::puzzles::sequence::{ClickOutcome, LocationSequence};

use super::{rise_in, shake, stage_fade_in, StageView, ENTER_SEQUENCE};

const ROSE: &str = "#fb7185";
const WHITE: &str = "#ffffff";
const GREY: &str = "#9ca3af";

pub const SUCCESS_TARGET: &str = "success-message";

pub fn marker_target(id: LocationId) -> String {
    format!("marker:{}", id)
}

pub fn card_target(zone: &str) -> String {
    format!("map-card:{}", zone)
}

/// Circle-marker style, derived from puzzle progress and the pulse highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    pub color: &'static str,
    pub weight: f32,
}

impl MarkerStyle {
    pub fn derive(clicked: bool, pulsing: bool) -> Self {
        Self {
            radius: if pulsing { 15.0 } else { 10.0 },
            fill_color: if clicked { ROSE } else { WHITE },
            fill_opacity: if clicked { 0.9 } else { 0.8 },
            color: if clicked { ROSE } else { GREY },
            weight: if clicked { 4.0 } else { 3.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: LocationId,
    /// `[lat, lng]`, the order map libraries expect.
    pub position: [f64; 2],
    pub style: MarkerStyle,
    /// Masked name until found, full name after.
    pub label: String,
    /// 1-based position in the clicked sequence.
    pub order: Option<usize>,
    pub memory: Option<String>,
}

/// Dashed line between two consecutive finds in the same zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub color: &'static str,
    pub weight: f32,
    pub dash: &'static str,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneView {
    pub key: String,
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MarkerView>,
    pub segments: Vec<SegmentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationsView {
    pub zones: Vec<ZoneView>,
    pub step: usize,
    pub total: usize,
    /// Location of the last wrong click while the error message is up.
    pub error: Option<LocationId>,
    pub error_generation: u32,
    pub pulsing: Option<LocationId>,
    pub complete: bool,
}

fn lat_lng(coord: DVec2) -> [f64; 2] {
    [coord.y, coord.x]
}

/// Riddle 1: retrace the story by clicking map locations in order.
#[derive(Debug)]
pub struct LocationsScreen {
    puzzle: LocationSequence,
    zones: Vec<Zone>,
    locations: Vec<Location>,
    error: Transient<LocationId>,
    pulse: Transient<LocationId>,
    error_secs: f32,
    pulse_secs: f32,
}

impl LocationsScreen {
    pub fn new(config: &ExperienceConfig) -> Self {
        Self {
            puzzle: LocationSequence::new(config.location_order.clone()),
            zones: config.zones.clone(),
            locations: config.locations.clone(),
            error: Transient::new(),
            pulse: Transient::new(),
            error_secs: config.sequence_error_secs,
            pulse_secs: config.marker_pulse_secs,
        }
    }

    pub fn puzzle(&self) -> &LocationSequence {
        &self.puzzle
    }

    fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    fn click(&mut self, id: LocationId, ctx: &mut StageContext) {
        if self.puzzle.is_complete() {
            return;
        }
        if self.location(id).is_none() {
            log::debug!("riddle1: unknown location {}", id);
            return;
        }

        match self.puzzle.click(id) {
            ClickOutcome::Accepted { step, completed } => {
                log::debug!("riddle1: location {} accepted ({}/{})", id, step, self.puzzle.total());
                self.error.clear();
                self.pulse.show(id, self.pulse_secs);
                ctx.emit_event(
                    GameEvent::new(events::LOCATION_ACCEPTED)
                        .with_a(id.0 as f32)
                        .with_b(step as f32)
                        .with_c(self.puzzle.total() as f32),
                );
                ctx.animate(Sequence::new("marker-pop").then(Step::single(
                    Tween::from_to(marker_target(id), Property::Scale, 1.0, 1.5, 0.3)
                        .with_easing(Easing::POP)
                        .repeat(1)
                        .yoyo(),
                )));
                if completed {
                    ctx.animate(
                        Sequence::new("success")
                            .then(Step::pause(0.5))
                            .then(rise_in(SUCCESS_TARGET, 20.0, 0.8)),
                    );
                    ctx.complete(Outcome::Solved);
                }
            }
            ClickOutcome::Rejected => {
                log::debug!("riddle1: location {} rejected", id);
                self.error.show(id, self.error_secs);
                ctx.emit_event(GameEvent::new(events::LOCATION_REJECTED).with_a(id.0 as f32));
                ctx.animate(shake("marker-reject", &marker_target(id), 8.0, 0.1, 5));
            }
        }
    }

    fn zone_view(&self, zone: &Zone) -> ZoneView {
        let pulsing = self.pulse.get().copied();
        let markers = self
            .locations
            .iter()
            .filter(|l| l.zone == zone.key)
            .map(|l| {
                let order = self.puzzle.order_of(l.id);
                let clicked = order.is_some();
                MarkerView {
                    id: l.id,
                    position: lat_lng(l.coord),
                    style: MarkerStyle::derive(clicked, pulsing == Some(l.id)),
                    label: if clicked { l.full_name.clone() } else { l.hint_name.clone() },
                    order,
                    memory: clicked.then(|| l.memory.clone()),
                }
            })
            .collect();

        let segments = self
            .puzzle
            .clicked()
            .windows(2)
            .filter_map(|pair| {
                let from = self.location(pair[0])?;
                let to = self.location(pair[1])?;
                (from.zone == zone.key && to.zone == zone.key).then(|| SegmentView {
                    from: lat_lng(from.coord),
                    to: lat_lng(to.coord),
                    color: ROSE,
                    weight: 2.0,
                    dash: "5, 5",
                    opacity: 0.7,
                })
            })
            .collect();

        ZoneView {
            key: zone.key.clone(),
            title: zone.title.clone(),
            center: lat_lng(zone.center),
            zoom: zone.zoom,
            markers,
            segments,
        }
    }
}

impl StageScreen for LocationsScreen {
    fn kind(&self) -> StageKind {
        StageKind::Riddle1
    }

    fn enter(&mut self, ctx: &mut StageContext) {
        let cards = self.zones.iter().map(|z| card_target(&z.key));
        let step = Step::single(stage_fade_in())
            .join(Step::stagger(cards.clone(), 0.15, |target| {
                Tween::from_to(target, Property::Opacity, 0.0, 1.0, 0.8)
                    .with_easing(Easing::QuartOut)
                    .with_delay(0.3)
            }))
            .join(Step::stagger(cards, 0.15, |target| {
                Tween::from_to(target, Property::Y, 30.0, 0.0, 0.8)
                    .with_easing(Easing::QuartOut)
                    .with_delay(0.3)
            }));
        ctx.animate(Sequence::new(ENTER_SEQUENCE).then(step));
    }

    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext) {
        if let InputEvent::ClickLocation(id) = input {
            self.click(*id, ctx);
        }
    }

    fn tick(&mut self, dt: f32, _ctx: &mut StageContext) {
        self.error.tick(dt);
        self.pulse.tick(dt);
    }

    fn view(&self) -> StageView {
        StageView::Riddle1(LocationsView {
            zones: self.zones.iter().map(|z| self.zone_view(z)).collect(),
            step: self.puzzle.step(),
            total: self.puzzle.total(),
            error: self.error.get().copied(),
            error_generation: self.error.generation(),
            pulsing: self.pulse.get().copied(),
            complete: self.puzzle.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::MemoryStore;
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

        fn click(&mut self, screen: &mut LocationsScreen, id: u32) -> Option<Outcome> {
            let mut ctx = StageContext::new(&mut self.store, &mut self.events, &mut self.timeline);
            screen.handle(&InputEvent::ClickLocation(LocationId(id)), &mut ctx);
            ctx.take_outcome()
        }

        fn tick(&mut self, screen: &mut LocationsScreen, dt: f32) {
            let mut ctx = StageContext::new(&mut self.store, &mut self.events, &mut self.timeline);
            screen.tick(dt, &mut ctx);
        }
    }

    fn view(screen: &LocationsScreen) -> LocationsView {
        match screen.view() {
            StageView::Riddle1(view) => view,
            other => panic!("expected riddle1 view, got {:?}", other),
        }
    }

    fn marker(view: &LocationsView, id: u32) -> MarkerView {
        view.zones
            .iter()
            .flat_map(|z| z.markers.iter())
            .find(|m| m.id == LocationId(id))
            .cloned()
            .unwrap()
    }

    #[test]
    fn full_order_solves_on_eighth_click() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());
        let order = [7, 3, 1, 8, 6, 4, 5, 2];
        for (i, id) in order.iter().enumerate() {
            let outcome = h.click(&mut screen, *id);
            if i + 1 < order.len() {
                assert_eq!(outcome, None, "click {} should not solve", i + 1);
            } else {
                assert_eq!(outcome, Some(Outcome::Solved));
            }
        }
        assert!(view(&screen).complete);
        assert_eq!(h.events.iter().filter(|e| e.kind == events::LOCATION_ACCEPTED).count(), 8);
    }

    #[test]
    fn accepted_event_carries_progress() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());
        h.click(&mut screen, 7);
        h.click(&mut screen, 3);

        let accepted: Vec<_> = h.events.iter().filter(|e| e.kind == events::LOCATION_ACCEPTED).collect();
        assert_eq!(accepted.len(), 2);
        assert_eq!((accepted[0].a, accepted[0].b, accepted[0].c), (7.0, 1.0, 8.0));
        assert_eq!((accepted[1].a, accepted[1].b, accepted[1].c), (3.0, 2.0, 8.0));
    }

    #[test]
    fn wrong_click_flashes_error_for_two_seconds() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());

        h.click(&mut screen, 3);
        let v = view(&screen);
        assert_eq!(v.error, Some(LocationId(3)));
        assert_eq!(v.step, 0);

        h.tick(&mut screen, 1.5);
        assert!(view(&screen).error.is_some());
        h.tick(&mut screen, 0.6);
        assert_eq!(view(&screen).error, None);
    }

    #[test]
    fn newer_error_restarts_the_countdown() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());

        h.click(&mut screen, 3);
        h.tick(&mut screen, 1.5);
        h.click(&mut screen, 2);
        h.tick(&mut screen, 1.0);
        let v = view(&screen);
        assert_eq!(v.error, Some(LocationId(2)));
        assert_eq!(v.error_generation, 2);
    }

    #[test]
    fn found_marker_pulses_then_settles() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());
        h.click(&mut screen, 7);

        let found = marker(&view(&screen), 7);
        assert_eq!(found.style.radius, 15.0);
        assert_eq!(found.style.fill_color, ROSE);
        assert_eq!(found.order, Some(1));
        assert!(found.memory.is_some());

        h.tick(&mut screen, 1.0);
        let settled = marker(&view(&screen), 7);
        assert_eq!(settled.style.radius, 10.0);
        assert_eq!(settled.style.fill_color, ROSE);

        let untouched = marker(&view(&screen), 3);
        assert_eq!(untouched.style.fill_color, WHITE);
        assert_eq!(untouched.order, None);
        assert_eq!(untouched.memory, None);
    }

    #[test]
    fn segments_only_join_consecutive_finds_in_one_zone() {
        let config = ExperienceConfig::default();
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&config);
        for id in [7, 3, 1, 8, 6, 4, 5, 2] {
            h.click(&mut screen, id);
        }

        let v = view(&screen);
        let expected: usize = config
            .location_order
            .windows(2)
            .filter(|pair| {
                let a = config.location(pair[0]).map(|l| &l.zone);
                let b = config.location(pair[1]).map(|l| &l.zone);
                a == b
            })
            .count();
        let drawn: usize = v.zones.iter().map(|z| z.segments.len()).sum();
        assert_eq!(drawn, expected);
        assert!(v.zones.iter().flat_map(|z| &z.segments).all(|s| s.dash == "5, 5"));
    }

    #[test]
    fn unknown_location_and_clicks_after_completion_are_ignored() {
        let mut h = Harness::new();
        let mut screen = LocationsScreen::new(&ExperienceConfig::default());
        assert_eq!(h.click(&mut screen, 99), None);
        assert_eq!(view(&screen).error, None);

        for id in [7, 3, 1, 8, 6, 4, 5, 2] {
            h.click(&mut screen, id);
        }
        let before = h.events.len();
        assert_eq!(h.click(&mut screen, 7), None);
        assert_eq!(h.events.len(), before);
    }
}
