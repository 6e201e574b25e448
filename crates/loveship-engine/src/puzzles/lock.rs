use serde::Serialize;

use crate::api::config::WHEEL_COUNT;

/// Per-wheel result of the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelFeedback {
    /// Not checked yet.
    #[default]
    None,
    Match,
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeCheck {
    pub feedback: [WheelFeedback; WHEEL_COUNT],
    pub attempts: u32,
    pub unlocked: bool,
    /// True on the check that first made the hint visible.
    pub hint_revealed: bool,
}

impl CodeCheck {
    pub fn matches(&self) -> usize {
        self.feedback.iter().filter(|f| **f == WheelFeedback::Match).count()
    }
}

/// Riddle 2a: a four-wheel combination lock.
///
/// Wheels wrap modulo 10 in both directions. Once opened the lock is
/// frozen and further input is ignored.
#[derive(Debug, Clone)]
pub struct CombinationLock {
    wheels: [u8; WHEEL_COUNT],
    target: [u8; WHEEL_COUNT],
    feedback: [WheelFeedback; WHEEL_COUNT],
    attempts: u32,
    hint_after: u32,
    hint_visible: bool,
    unlocked: bool,
}

impl CombinationLock {
    pub fn new(target: [u8; WHEEL_COUNT], hint_after: u32) -> Self {
        Self {
            wheels: [0; WHEEL_COUNT],
            target,
            feedback: [WheelFeedback::None; WHEEL_COUNT],
            attempts: 0,
            hint_after,
            hint_visible: false,
            unlocked: false,
        }
    }

    /// Turn one wheel by `delta` steps. Returns the new digit, or `None`
    /// when the index is out of range or the lock is already open.
    pub fn set_wheel(&mut self, index: usize, delta: i32) -> Option<u8> {
        if self.unlocked {
            return None;
        }
        let wheel = self.wheels.get_mut(index)?;
        *wheel = (i32::from(*wheel) + delta.rem_euclid(10)).rem_euclid(10) as u8;
        Some(*wheel)
    }

    /// Compare every wheel against the code. Feedback is always produced.
    /// Returns `None` once the lock is open.
    pub fn validate(&mut self) -> Option<CodeCheck> {
        if self.unlocked {
            return None;
        }
        for (i, feedback) in self.feedback.iter_mut().enumerate() {
            *feedback = if self.wheels[i] == self.target[i] {
                WheelFeedback::Match
            } else {
                WheelFeedback::Mismatch
            };
        }
        self.attempts += 1;
        self.unlocked = self.feedback.iter().all(|f| *f == WheelFeedback::Match);

        let mut hint_revealed = false;
        if !self.unlocked && !self.hint_visible && self.attempts >= self.hint_after {
            self.hint_visible = true;
            hint_revealed = true;
        }

        Some(CodeCheck {
            feedback: self.feedback,
            attempts: self.attempts,
            unlocked: self.unlocked,
            hint_revealed,
        })
    }

    pub fn wheels(&self) -> [u8; WHEEL_COUNT] {
        self.wheels
    }

    pub fn feedback(&self) -> [WheelFeedback; WHEEL_COUNT] {
        self.feedback
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock() -> CombinationLock {
        CombinationLock::new([1, 6, 9, 3], 3)
    }

    fn dial(lock: &mut CombinationLock, code: [u8; WHEEL_COUNT]) {
        for (i, digit) in code.iter().enumerate() {
            let current = lock.wheels()[i];
            lock.set_wheel(i, i32::from(*digit) - i32::from(current));
        }
    }

    #[test]
    fn wheels_wrap_both_ways() {
        let mut l = lock();
        assert_eq!(l.set_wheel(0, -1), Some(9));
        assert_eq!(l.set_wheel(0, 1), Some(0));
        dial(&mut l, [9, 0, 0, 0]);
        assert_eq!(l.set_wheel(0, 1), Some(0));
        assert_eq!(l.set_wheel(1, -21), Some(9));
    }

    #[test]
    fn extreme_deltas_wrap_without_overflow() {
        let mut l = lock();
        assert_eq!(l.set_wheel(0, 1), Some(1));
        assert_eq!(l.set_wheel(0, i32::MAX), Some(8));
        assert_eq!(l.set_wheel(1, i32::MIN), Some(2));
        assert_eq!(l.set_wheel(2, i32::MIN), Some(2));
        assert_eq!(l.set_wheel(2, i32::MAX), Some(9));
    }

    #[test]
    fn out_of_range_wheel_is_ignored() {
        let mut l = lock();
        assert_eq!(l.set_wheel(4, 1), None);
        assert_eq!(l.wheels(), [0, 0, 0, 0]);
    }

    #[test]
    fn correct_code_unlocks() {
        let mut l = lock();
        dial(&mut l, [1, 6, 9, 3]);
        let check = l.validate().unwrap();
        assert!(check.unlocked);
        assert_eq!(check.feedback, [WheelFeedback::Match; 4]);
        assert!(l.is_unlocked());
    }

    #[test]
    fn single_wrong_digit_gives_single_mismatch() {
        let mut l = lock();
        dial(&mut l, [1, 6, 9, 4]);
        let check = l.validate().unwrap();
        assert!(!check.unlocked);
        assert_eq!(check.matches(), 3);
        assert_eq!(
            check.feedback,
            [
                WheelFeedback::Match,
                WheelFeedback::Match,
                WheelFeedback::Match,
                WheelFeedback::Mismatch,
            ]
        );
    }

    #[test]
    fn hint_appears_on_third_failure_and_stays() {
        let mut l = lock();
        assert!(!l.validate().unwrap().hint_revealed);
        assert!(!l.validate().unwrap().hint_revealed);
        assert!(!l.hint_visible());
        assert!(l.validate().unwrap().hint_revealed);
        assert!(l.hint_visible());
        let fourth = l.validate().unwrap();
        assert!(!fourth.hint_revealed);
        assert!(l.hint_visible());
        assert_eq!(l.attempts(), 4);
    }

    #[test]
    fn open_lock_is_frozen() {
        let mut l = lock();
        dial(&mut l, [1, 6, 9, 3]);
        l.validate();
        assert_eq!(l.set_wheel(0, 1), None);
        assert_eq!(l.validate(), None);
        assert_eq!(l.wheels(), [1, 6, 9, 3]);
        assert_eq!(l.attempts(), 1);
    }
}
