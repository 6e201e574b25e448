use serde::Serialize;

use crate::api::config::{ExperienceConfig, WHEEL_COUNT};
use crate::api::stage::{Outcome, StageContext, StageScreen};
use crate::api::types::{events, GameEvent, StageKind};
use crate::core::timer::Transient;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Property, Sequence, Step, Tween};
use crate::input::event::InputEvent;
use crate::puzzles::lock::{CombinationLock, WheelFeedback};
use crate::puzzles::phrase::{normalize_letter, GuessOutcome, PhraseCell, PhraseReveal};

use super::{rise_in, shake, stage_fade_in, StageView, ENTER_SEQUENCE};

pub const LOCK_TARGET: &str = "lock";
pub const REVEAL_TARGET: &str = "success-reveal";
pub const PHRASE_TARGET: &str = "phrase-display";
pub const GAME_TARGET: &str = "hangman-game";
pub const FINAL_BUTTON_TARGET: &str = "final-button";
/// Name of the sequence that writes out the solved phrase.
pub const PHRASE_REVEAL_SEQUENCE: &str = "phrase-reveal";

pub fn wheel_target(index: usize) -> String {
    format!("wheel:{}", index)
}

pub fn key_target(letter: char) -> String {
    format!("key:{}", letter)
}

pub fn final_char_target(index: usize) -> String {
    format!("final-char:{}", index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Idle,
    Hit,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyView {
    pub letter: char,
    pub state: KeyState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseView {
    pub lives: u8,
    pub max_lives: u8,
    pub words: Vec<Vec<PhraseCell>>,
    pub keyboard: Vec<Vec<KeyView>>,
    /// The "out of lives" notice is up.
    pub resetting: bool,
    pub complete: bool,
    /// The solved phrase as a sentence, once complete.
    pub sentence: Option<String>,
    pub reveal_finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockView {
    pub wheels: [u8; WHEEL_COUNT],
    pub feedback: [WheelFeedback; WHEEL_COUNT],
    pub attempts: u32,
    pub hint: Option<String>,
    pub unlocked: bool,
    /// Present once the lock is open.
    pub phrase: Option<PhraseView>,
}

/// Capitalize the first character, as the solved phrase is displayed.
fn sentence(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Riddle 2: a combination lock guarding a letter-by-letter phrase reveal.
#[derive(Debug)]
pub struct LockScreen {
    lock: CombinationLock,
    phrase: Option<PhraseReveal>,
    phrase_text: String,
    lives: u8,
    hint_text: String,
    keyboard: Vec<Vec<char>>,
    reset_notice: Transient<()>,
    reset_secs: f32,
    reveal_finished: bool,
}

impl LockScreen {
    pub fn new(config: &ExperienceConfig) -> Self {
        Self {
            lock: CombinationLock::new(config.lock_code, config.hint_after_attempts),
            phrase: None,
            phrase_text: config.phrase.clone(),
            lives: config.lives,
            hint_text: config.hint_text.clone(),
            keyboard: config.keyboard_rows.iter().map(|row| row.chars().collect()).collect(),
            reset_notice: Transient::new(),
            reset_secs: config.phrase_reset_secs,
            reveal_finished: false,
        }
    }

    pub fn lock(&self) -> &CombinationLock {
        &self.lock
    }

    pub fn phrase(&self) -> Option<&PhraseReveal> {
        self.phrase.as_ref()
    }

    fn turn_wheel(&mut self, index: usize, delta: i32, ctx: &mut StageContext) {
        if let Some(digit) = self.lock.set_wheel(index, delta) {
            ctx.emit_event(
                GameEvent::new(events::WHEEL_CHANGED)
                    .with_a(index as f32)
                    .with_b(f32::from(digit)),
            );
        }
    }

    fn check_code(&mut self, ctx: &mut StageContext) {
        let Some(check) = self.lock.validate() else {
            return;
        };
        log::debug!(
            "riddle2: code check #{} matched {}/{}",
            check.attempts,
            check.matches(),
            WHEEL_COUNT
        );
        ctx.emit_event(
            GameEvent::new(events::CODE_CHECKED)
                .with_a(check.attempts as f32)
                .with_b(check.matches() as f32),
        );
        if check.hint_revealed {
            ctx.emit_event(GameEvent::new(events::HINT_SHOWN));
        }

        if check.unlocked {
            log::info!("riddle2: lock opened after {} attempts", check.attempts);
            self.phrase = Some(PhraseReveal::new(&self.phrase_text, self.lives));
            ctx.emit_event(GameEvent::new(events::LOCK_OPENED));
            ctx.animate(Sequence::new("lock-open").then(Step::single(
                Tween::from_to(LOCK_TARGET, Property::Scale, 1.0, 1.1, 0.3)
                    .with_easing(Easing::POP)
                    .repeat(1)
                    .yoyo(),
            )));
            ctx.animate(
                Sequence::new("reveal-game")
                    .then(Step::pause(0.5))
                    .then(rise_in(REVEAL_TARGET, 16.0, 0.8)),
            );
        } else {
            ctx.animate(shake("lock-reject", LOCK_TARGET, 10.0, 0.1, 5));
        }
    }

    fn guess(&mut self, letter: char, ctx: &mut StageContext) {
        let Some(phrase) = self.phrase.as_mut() else {
            return;
        };
        let Some(normalized) = normalize_letter(letter) else {
            return;
        };
        let code = u32::from(normalized) as f32;

        match phrase.guess(letter) {
            GuessOutcome::Ignored => {}
            GuessOutcome::Hit { complete } => {
                ctx.emit_event(
                    GameEvent::new(events::LETTER_HIT)
                        .with_a(code)
                        .with_b(phrase.guessed().len() as f32)
                        .with_c(phrase.required().len() as f32),
                );
                ctx.animate(Sequence::new("key-hit").then(Step::single(
                    Tween::from_to(key_target(normalized), Property::Scale, 0.9, 1.0, 0.3)
                        .with_easing(Easing::POP),
                )));
                if complete {
                    log::info!("riddle2: phrase complete");
                    let chars = phrase.phrase().chars().filter(|c| *c != ' ').count();
                    ctx.animate(reveal_sequence(chars));
                    ctx.complete(Outcome::Solved);
                }
            }
            GuessOutcome::Miss { lives } => {
                log::debug!("riddle2: '{}' missed, {} lives left", normalized, lives);
                ctx.emit_event(
                    GameEvent::new(events::LETTER_MISS)
                        .with_a(code)
                        .with_b(f32::from(lives)),
                );
                ctx.animate(shake("key-miss", &key_target(normalized), 4.0, 0.08, 4));
            }
            GuessOutcome::Reset => {
                log::debug!("riddle2: out of lives, phrase reset");
                self.reset_notice.show((), self.reset_secs);
                ctx.emit_event(GameEvent::new(events::LETTER_MISS).with_a(code));
                ctx.emit_event(GameEvent::new(events::PHRASE_RESET));
                ctx.animate(shake("key-miss", &key_target(normalized), 4.0, 0.08, 4));
                ctx.animate(Sequence::new("phrase-reset").then(Step::single(
                    Tween::from_to(PHRASE_TARGET, Property::Opacity, 0.0, 1.0, 0.5)
                        .with_delay(self.reset_secs),
                )));
            }
        }
    }

    fn phrase_view(&self, phrase: &PhraseReveal) -> PhraseView {
        let keyboard = self
            .keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&letter| {
                        let key = normalize_letter(letter).unwrap_or(letter);
                        let state = if phrase.guessed().contains(&key) {
                            KeyState::Hit
                        } else if phrase.wrong().contains(&key) {
                            KeyState::Miss
                        } else {
                            KeyState::Idle
                        };
                        KeyView { letter, state }
                    })
                    .collect()
            })
            .collect();

        PhraseView {
            lives: phrase.lives(),
            max_lives: phrase.max_lives(),
            words: phrase.cells(),
            keyboard,
            resetting: self.reset_notice.is_active(),
            complete: phrase.is_complete(),
            sentence: phrase.is_complete().then(|| sentence(phrase.phrase())),
            reveal_finished: self.reveal_finished,
        }
    }
}

/// Fade the game out, write the phrase left to right, then offer to continue.
fn reveal_sequence(chars: usize) -> Sequence {
    Sequence::new(PHRASE_REVEAL_SEQUENCE)
        .then(Step::single(
            Tween::from_to(GAME_TARGET, Property::Opacity, 1.0, 0.0, 0.5),
        ))
        .then(Step::stagger((0..chars).map(final_char_target), 0.04, |target| {
            Tween::from_to(target, Property::Opacity, 0.0, 1.0, 0.05).with_easing(Easing::Linear)
        }))
        .then(Step::pause(0.2))
        .then(rise_in(FINAL_BUTTON_TARGET, 16.0, 0.8))
}

impl StageScreen for LockScreen {
    fn kind(&self) -> StageKind {
        StageKind::Riddle2
    }

    fn enter(&mut self, ctx: &mut StageContext) {
        let wheels = Step::stagger((0..WHEEL_COUNT).map(wheel_target), 0.1, |target| {
            Tween::from_to(target, Property::Scale, 0.8, 1.0, 0.6)
                .with_easing(Easing::BackOut(1.7))
                .with_delay(0.6)
        });
        ctx.animate(
            Sequence::new(ENTER_SEQUENCE).then(Step::single(stage_fade_in()).join(wheels)),
        );
    }

    fn handle(&mut self, input: &InputEvent, ctx: &mut StageContext) {
        match input {
            InputEvent::TurnWheel { index, delta } => self.turn_wheel(*index, *delta, ctx),
            InputEvent::CheckCode => self.check_code(ctx),
            InputEvent::GuessLetter(letter) => self.guess(*letter, ctx),
            _ => {}
        }
    }

    fn tick(&mut self, dt: f32, _ctx: &mut StageContext) {
        self.reset_notice.tick(dt);
    }

    fn on_sequence_complete(&mut self, name: &str, _ctx: &mut StageContext) {
        if name == PHRASE_REVEAL_SEQUENCE {
            self.reveal_finished = true;
        }
    }

    fn view(&self) -> StageView {
        StageView::Riddle2(LockView {
            wheels: self.lock.wheels(),
            feedback: self.lock.feedback(),
            attempts: self.lock.attempts(),
            hint: (self.lock.hint_visible() && !self.lock.is_unlocked())
                .then(|| self.hint_text.clone()),
            unlocked: self.lock.is_unlocked(),
            phrase: self.phrase.as_ref().map(|p| self.phrase_view(p)),
        })
    }
}
