use crate::api::types::LocationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was the next expected location. `step` is the clicked count after it.
    Accepted { step: usize, completed: bool },
    Rejected,
}

/// Riddle 1: locations must be clicked in one fixed order.
///
/// `clicked` is always a prefix of `expected`; only the single next
/// expected id is ever accepted.
#[derive(Debug, Clone)]
pub struct LocationSequence {
    expected: Vec<LocationId>,
    clicked: Vec<LocationId>,
}

impl LocationSequence {
    pub fn new(expected: Vec<LocationId>) -> Self {
        Self {
            clicked: Vec::with_capacity(expected.len()),
            expected,
        }
    }

    pub fn click(&mut self, id: LocationId) -> ClickOutcome {
        match self.next_expected() {
            Some(next) if next == id => {
                self.clicked.push(id);
                ClickOutcome::Accepted {
                    step: self.clicked.len(),
                    completed: self.is_complete(),
                }
            }
            _ => ClickOutcome::Rejected,
        }
    }

    pub fn next_expected(&self) -> Option<LocationId> {
        self.expected.get(self.clicked.len()).copied()
    }

    pub fn clicked(&self) -> &[LocationId] {
        &self.clicked
    }

    /// 1-based position of `id` in the clicked sequence.
    pub fn order_of(&self, id: LocationId) -> Option<usize> {
        self.clicked.iter().position(|&c| c == id).map(|i| i + 1)
    }

    pub fn step(&self) -> usize {
        self.clicked.len()
    }

    pub fn total(&self) -> usize {
        self.expected.len()
    }

    pub fn is_complete(&self) -> bool {
        self.clicked.len() == self.expected.len()
    }
}
