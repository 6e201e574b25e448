#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealOutcome {
    Cracked(u32),
    Opened,
    Ignored,
}

/// Conclusion gate: the wax seal breaks after a fixed number of clicks.
/// Opening is one-way.
#[derive(Debug, Clone)]
pub struct WaxSeal {
    clicks: u32,
    required: u32,
}

impl WaxSeal {
    pub fn new(required: u32) -> Self {
        Self { clicks: 0, required }
    }

    pub fn crack(&mut self) -> SealOutcome {
        if self.is_open() {
            return SealOutcome::Ignored;
        }
        self.clicks += 1;
        if self.is_open() {
            SealOutcome::Opened
        } else {
            SealOutcome::Cracked(self.clicks)
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn is_open(&self) -> bool {
        self.clicks >= self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_on_third_click_and_stays_open() {
        let mut seal = WaxSeal::new(3);
        assert_eq!(seal.crack(), SealOutcome::Cracked(1));
        assert_eq!(seal.crack(), SealOutcome::Cracked(2));
        assert_eq!(seal.crack(), SealOutcome::Opened);
        assert!(seal.is_open());
        assert_eq!(seal.crack(), SealOutcome::Ignored);
        assert_eq!(seal.clicks(), 3);
    }
}
