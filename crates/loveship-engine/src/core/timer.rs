/// A value that is shown for a bounded time and then clears itself.
///
/// Every `show` bumps the generation and restarts the countdown, so an
/// older countdown can never clear a newer value. Hosts key shake/flash
/// animations on the generation to replay them for repeated errors.
#[derive(Debug, Clone)]
pub struct Transient<T> {
    value: Option<T>,
    remaining: f32,
    generation: u32,
}

impl<T> Transient<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            remaining: 0.0,
            generation: 0,
        }
    }

    /// Show `value` for `duration` seconds, replacing any current value.
    /// Returns the new generation.
    pub fn show(&mut self, value: T, duration: f32) -> u32 {
        self.value = Some(value);
        self.remaining = duration.max(0.0);
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Advance the countdown. Returns true if the value expired on this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.value.is_none() {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.value = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.remaining = 0.0;
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Default for Transient<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_duration() {
        let mut flash = Transient::new();
        flash.show((), 2.0);
        assert!(!flash.tick(1.5));
        assert!(flash.is_active());
        assert!(flash.tick(0.6));
        assert!(!flash.is_active());
        assert!(!flash.tick(1.0), "already cleared");
    }

    #[test]
    fn new_value_restarts_countdown() {
        let mut flash = Transient::new();
        flash.show(1, 2.0);
        flash.tick(1.5);
        flash.show(2, 2.0);
        assert!(!flash.tick(1.0), "second value must get its full duration");
        assert_eq!(flash.get(), Some(&2));
    }

    #[test]
    fn every_show_bumps_the_generation() {
        let mut flash = Transient::new();
        let first = flash.show("first", 2.0);
        let second = flash.show("second", 2.0);
        assert_ne!(first, second);
        assert_eq!(flash.generation(), second);
        assert_eq!(flash.get(), Some(&"second"));

        flash.clear();
        assert!(flash.get().is_none());
        assert_eq!(flash.generation(), second);
    }
}
