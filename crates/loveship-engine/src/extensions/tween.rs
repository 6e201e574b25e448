// extensions/tween.rs
//
// Declarative animation timeline. Stages describe what should move as named
// sequences of steps; the timeline advances them on `tick` and the host only
// applies the sampled values to its elements.
//
// Usage:
//   let mut timeline = Timeline::new();
//   timeline.add(Sequence::new("enter").then(Step::single(
//       Tween::from_to("stage", Property::Opacity, 0.0, 1.0, 1.0).with_easing(Easing::CubicOut),
//   )));
//   timeline.tick(dt);
//   for (id, name) in timeline.drain_completed() { ... }

use std::collections::BTreeMap;

use serde::Serialize;

use super::easing::{ease, Easing};

/// Animatable property of a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    /// Horizontal offset in pixels.
    X,
    /// Vertical offset in pixels.
    Y,
    Scale,
    /// Degrees.
    Rotation,
    /// SVG stroke-dashoffset, for lines that draw themselves.
    DashOffset,
    StrokeWidth,
}

impl Property {
    /// Value of an element nothing has animated yet.
    pub fn rest_value(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            Property::StrokeWidth => 2.0,
            Property::X | Property::Y | Property::Rotation | Property::DashOffset => 0.0,
        }
    }
}

/// What happens when a tween reaches its end value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    #[default]
    Once,
    /// Play this many extra times.
    Repeat(u32),
    Forever,
}

/// One property of one element moving between two values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: String,
    pub property: Property,
    /// Start value. `None` means "wherever the element is when the step starts".
    pub from: Option<f32>,
    pub to: f32,
    /// Seconds per cycle.
    pub duration: f32,
    /// Seconds before the first cycle starts.
    pub delay: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// Alternate direction on every repeat.
    pub yoyo: bool,
}

impl Tween {
    /// Animate from the element's current value to `to`.
    pub fn to(target: impl Into<String>, property: Property, to: f32, duration: f32) -> Self {
        Self {
            target: target.into(),
            property,
            from: None,
            to,
            duration,
            delay: 0.0,
            easing: Easing::CubicOut,
            loop_mode: TweenLoop::Once,
            yoyo: false,
        }
    }

    pub fn from_to(
        target: impl Into<String>,
        property: Property,
        from: f32,
        to: f32,
        duration: f32,
    ) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, property, to, duration)
        }
    }

    /// A horizontal shake between `-offset` and `offset`.
    pub fn shake(target: impl Into<String>, offset: f32, duration: f32, repeats: u32) -> Self {
        Self::from_to(target, Property::X, -offset, offset, duration)
            .with_easing(Easing::QuadInOut)
            .repeat(repeats)
            .yoyo()
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.loop_mode = TweenLoop::Repeat(times);
        self
    }

    pub fn forever(mut self) -> Self {
        self.loop_mode = TweenLoop::Forever;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    fn cycles(&self) -> Option<u32> {
        match self.loop_mode {
            TweenLoop::Once => Some(1),
            TweenLoop::Repeat(n) => Some(n + 1),
            TweenLoop::Forever => None,
        }
    }

    /// Seconds from step start until this tween settles. Infinite for `Forever`.
    pub fn total_duration(&self) -> f32 {
        match self.cycles() {
            Some(cycles) => self.delay + self.duration.max(0.0) * cycles as f32,
            None => f32::INFINITY,
        }
    }

    fn start(&self) -> f32 {
        self.from.unwrap_or_else(|| self.property.rest_value())
    }

    /// Value once every cycle has played.
    pub fn end_value(&self) -> f32 {
        match self.cycles() {
            Some(cycles) if self.yoyo && cycles % 2 == 0 => self.start(),
            _ => self.to,
        }
    }

    /// Value `elapsed` seconds after the step started.
    pub fn sample(&self, elapsed: f32) -> f32 {
        let from = self.start();
        if elapsed <= self.delay {
            return from;
        }
        if self.duration <= 0.0 {
            return self.end_value();
        }
        let local = elapsed - self.delay;
        let cycle = (local / self.duration).floor() as u32;
        if matches!(self.cycles(), Some(cycles) if cycle >= cycles) {
            return self.end_value();
        }
        let mut t = (local - cycle as f32 * self.duration) / self.duration;
        if self.yoyo && cycle % 2 == 1 {
            t = 1.0 - t;
        }
        ease(from, self.to, t, self.easing)
    }
}

/// Tweens that play together. A step ends when its longest tween settles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    tweens: Vec<Tween>,
    min_duration: f32,
}

impl Step {
    pub fn new(tweens: Vec<Tween>) -> Self {
        Self { tweens, min_duration: 0.0 }
    }

    pub fn single(tween: Tween) -> Self {
        Self::new(vec![tween])
    }

    /// A step that does nothing for `secs`.
    pub fn pause(secs: f32) -> Self {
        Self { tweens: Vec::new(), min_duration: secs }
    }

    /// One tween per target, each starting `stagger` seconds after the previous.
    pub fn stagger<I, F>(targets: I, stagger: f32, make: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(String) -> Tween,
    {
        let tweens = targets
            .into_iter()
            .enumerate()
            .map(|(i, target)| {
                let tween = make(target);
                let delay = tween.delay + i as f32 * stagger;
                tween.with_delay(delay)
            })
            .collect();
        Self::new(tweens)
    }

    pub fn and(mut self, tween: Tween) -> Self {
        self.tweens.push(tween);
        self
    }

    /// Play another step's tweens alongside this one's.
    pub fn join(mut self, other: Step) -> Self {
        self.tweens.extend(other.tweens);
        self.min_duration = self.min_duration.max(other.min_duration);
        self
    }

    pub fn duration(&self) -> f32 {
        self.tweens
            .iter()
            .map(Tween::total_duration)
            .fold(self.min_duration, f32::max)
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }
}

/// Named, ordered steps with a single completion signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    steps: Vec<Step>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), steps: Vec::new() }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Handle to a running sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SequenceId(pub u32);

/// A sampled property value for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimatedValue {
    pub target: String,
    pub property: Property,
    pub value: f32,
}

type ValueKey = (String, Property);

#[derive(Debug)]
struct Running {
    id: SequenceId,
    name: String,
    steps: Vec<Step>,
    index: usize,
    elapsed: f32,
}

/// Advances every running sequence and remembers where elements settled.
#[derive(Debug, Default)]
pub struct Timeline {
    running: Vec<Running>,
    settled: BTreeMap<ValueKey, f32>,
    next_id: u32,
    completed: Vec<(SequenceId, String)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence. It begins advancing on the next `tick`.
    /// Open-ended tweens of the first step start from the live value.
    pub fn add(&mut self, mut sequence: Sequence) -> SequenceId {
        if let Some(step) = sequence.steps.first_mut() {
            for tween in step.tweens.iter_mut().filter(|t| t.from.is_none()) {
                tween.from = Some(self.value(&tween.target, tween.property));
            }
        }
        let id = SequenceId(self.next_id);
        self.next_id += 1;
        self.running.push(Running {
            id,
            name: sequence.name,
            steps: sequence.steps,
            index: 0,
            elapsed: 0.0,
        });
        id
    }

    /// Advance all sequences by `dt` seconds.
    /// Returns the number of sequences that completed on this tick.
    pub fn tick(&mut self, dt: f32) -> usize {
        let settled = &mut self.settled;
        let mut finished = Vec::new();

        for run in self.running.iter_mut() {
            run.elapsed += dt;
            loop {
                let Some(step) = run.steps.get(run.index) else {
                    finished.push(run.id);
                    break;
                };
                let duration = step.duration();
                if run.elapsed < duration {
                    break;
                }
                for tween in step.tweens() {
                    settled.insert((tween.target.clone(), tween.property), tween.end_value());
                }
                run.elapsed -= duration;
                run.index += 1;
                resolve_starts(run, settled);
            }
        }

        let count = finished.len();
        let completed = &mut self.completed;
        self.running.retain(|run| {
            if finished.contains(&run.id) {
                completed.push((run.id, run.name.clone()));
                false
            } else {
                true
            }
        });
        count
    }

    /// Stop every tween on `target`, leaving it where it currently is.
    pub fn kill_target(&mut self, target: &str) {
        let settled = &mut self.settled;
        for run in self.running.iter_mut() {
            let (index, elapsed) = (run.index, run.elapsed);
            for (i, step) in run.steps.iter_mut().enumerate() {
                step.tweens.retain(|tween| {
                    if tween.target != target {
                        return true;
                    }
                    if i == index {
                        settled.insert((tween.target.clone(), tween.property), tween.sample(elapsed));
                    }
                    false
                });
            }
        }
    }

    /// Current value of every property that has been animated.
    pub fn values(&self) -> Vec<AnimatedValue> {
        let mut values = self.settled.clone();
        for run in &self.running {
            if let Some(step) = run.steps.get(run.index) {
                for tween in step.tweens() {
                    values.insert((tween.target.clone(), tween.property), tween.sample(run.elapsed));
                }
            }
        }
        values
            .into_iter()
            .map(|((target, property), value)| AnimatedValue { target, property, value })
            .collect()
    }

    /// Current value of one property.
    pub fn value(&self, target: &str, property: Property) -> f32 {
        for run in self.running.iter().rev() {
            if let Some(step) = run.steps.get(run.index) {
                if let Some(tween) = step
                    .tweens()
                    .iter()
                    .rev()
                    .find(|t| t.target == target && t.property == property)
                {
                    return tween.sample(run.elapsed);
                }
            }
        }
        self.settled
            .get(&(target.to_string(), property))
            .copied()
            .unwrap_or_else(|| property.rest_value())
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running.iter().any(|run| run.name == name)
    }

    /// Drain completed sequences since the last call.
    pub fn drain_completed(&mut self) -> Vec<(SequenceId, String)> {
        std::mem::take(&mut self.completed)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Drop all sequences and settled values.
    pub fn clear(&mut self) {
        self.running.clear();
        self.settled.clear();
        self.completed.clear();
    }
}

/// Pin every open-ended tween of a step that just started to the settled value.
fn resolve_starts(run: &mut Running, settled: &BTreeMap<ValueKey, f32>) {
    if let Some(step) = run.steps.get_mut(run.index) {
        for tween in step.tweens.iter_mut() {
            if tween.from.is_none() {
                let current = settled
                    .get(&(tween.target.clone(), tween.property))
                    .copied()
                    .unwrap_or_else(|| tween.property.rest_value());
                tween.from = Some(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(target: &str, from: f32, to: f32, secs: f32) -> Tween {
        Tween::from_to(target, Property::Opacity, from, to, secs).with_easing(Easing::Linear)
    }

    #[test]
    fn tween_samples_linearly_then_settles() {
        let tween = fade("stage", 0.0, 1.0, 1.0);
        assert_eq!(tween.sample(0.0), 0.0);
        assert!((tween.sample(0.5) - 0.5).abs() < 1e-4);
        assert_eq!(tween.sample(2.0), 1.0);
    }

    #[test]
    fn yoyo_repeat_returns_to_start() {
        let pulse = Tween::from_to("marker:7", Property::Scale, 1.0, 1.5, 0.3)
            .with_easing(Easing::Linear)
            .repeat(1)
            .yoyo();
        assert!((pulse.total_duration() - 0.6).abs() < 1e-5);
        assert!((pulse.sample(0.3 - 1e-3) - 1.5).abs() < 0.01);
        assert!((pulse.sample(0.45) - 1.25).abs() < 0.01);
        assert_eq!(pulse.end_value(), 1.0);
    }

    #[test]
    fn delay_holds_start_value() {
        let tween = fade("card", 0.0, 1.0, 1.0).with_delay(0.5);
        assert_eq!(tween.sample(0.4), 0.0);
        assert!((tween.sample(1.0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn stagger_offsets_each_target() {
        let step = Step::stagger(
            (0..3).map(|i| format!("wheel:{}", i)),
            0.1,
            |target| fade(&target, 0.0, 1.0, 0.6),
        );
        let delays: Vec<f32> = step.tweens().iter().map(|t| t.delay).collect();
        assert_eq!(delays.len(), 3);
        assert!((delays[2] - 0.2).abs() < 1e-6);
        assert!((step.duration() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn sequence_runs_steps_in_order_and_reports_once() {
        let mut timeline = Timeline::new();
        let id = timeline.add(
            Sequence::new("open-letter")
                .then(Step::single(fade("seal", 1.0, 0.0, 0.5)))
                .then(Step::pause(0.1))
                .then(Step::single(fade("letter", 0.0, 1.0, 0.8))),
        );

        assert_eq!(timeline.tick(0.25), 0);
        assert!((timeline.value("seal", Property::Opacity) - 0.5).abs() < 1e-3);
        assert_eq!(timeline.value("letter", Property::Opacity), 1.0, "not started yet");

        assert_eq!(timeline.tick(0.5), 0);
        assert_eq!(timeline.value("seal", Property::Opacity), 0.0);

        assert_eq!(timeline.tick(1.0), 1);
        assert!(timeline.is_empty());
        assert_eq!(timeline.drain_completed(), vec![(id, "open-letter".to_string())]);
        assert!(timeline.drain_completed().is_empty());
        assert_eq!(timeline.value("letter", Property::Opacity), 1.0);
    }

    #[test]
    fn open_ended_tween_starts_from_settled_value() {
        let mut timeline = Timeline::new();
        timeline.add(Sequence::new("arm").then(Step::single(
            Tween::to("star:rigel", Property::Scale, 1.4, 0.3).with_easing(Easing::Linear),
        )));
        timeline.tick(1.0);
        timeline.add(Sequence::new("disarm").then(Step::single(
            Tween::to("star:rigel", Property::Scale, 1.0, 0.4).with_easing(Easing::Linear),
        )));
        timeline.tick(0.2);
        assert!((timeline.value("star:rigel", Property::Scale) - 1.2).abs() < 1e-3);
    }

    #[test]
    fn interrupting_tween_starts_from_live_value() {
        let mut timeline = Timeline::new();
        timeline.add(Sequence::new("arm").then(Step::single(
            Tween::from_to("star:rigel", Property::Scale, 1.0, 1.4, 0.4).with_easing(Easing::Linear),
        )));
        timeline.tick(0.2);
        timeline.add(Sequence::new("disarm").then(Step::single(
            Tween::to("star:rigel", Property::Scale, 1.0, 0.3),
        )));
        let values = timeline.values();
        assert_eq!(values.len(), 1);
        assert!((values[0].value - 1.2).abs() < 1e-3);
    }

    #[test]
    fn forever_tween_never_completes_until_killed() {
        let mut timeline = Timeline::new();
        timeline.add(Sequence::new("seal-pulse").then(Step::single(
            Tween::from_to("seal", Property::Scale, 1.0, 1.05, 1.5).forever().yoyo(),
        )));
        assert_eq!(timeline.tick(100.0), 0);
        assert!(timeline.is_running("seal-pulse"));

        timeline.kill_target("seal");
        assert_eq!(timeline.tick(0.0), 1);
        assert!(!timeline.is_running("seal-pulse"));
    }

    #[test]
    fn values_merge_settled_and_live() {
        let mut timeline = Timeline::new();
        timeline.add(Sequence::new("a").then(Step::single(fade("stage", 0.0, 1.0, 0.1))));
        timeline.tick(0.2);
        timeline.add(Sequence::new("b").then(Step::single(fade("card", 0.0, 1.0, 1.0))));
        let values = timeline.values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].target, "card");
        assert_eq!(values[1].target, "stage");
        assert_eq!(values[1].value, 1.0);
    }
}
