use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::api::types::StarId;

/// Canonical, order-independent key of a star pair: the two ids sorted
/// lexicographically and joined with `-` (e.g. `"bellatrix-betelgeuse"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeKey(String);

impl EdgeKey {
    pub fn new(a: &StarId, b: &StarId) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}-{}", lo, hi))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Unknown star, or the constellation is already complete.
    Ignored,
    Armed(StarId),
    Disarmed(StarId),
    /// The pair was already connected; the armed star is released.
    AlreadyFound(EdgeKey),
    Found { edge: EdgeKey, found: usize, complete: bool },
    /// Not a target edge. Both stars should show the rejection.
    Rejected(StarId, StarId),
}

/// Riddle 3: connect the stars of a constellation two at a time.
#[derive(Debug, Clone)]
pub struct Constellation {
    stars: BTreeSet<StarId>,
    target: BTreeSet<EdgeKey>,
    found: BTreeSet<EdgeKey>,
    /// Star endpoints of each target edge, in canonical order.
    endpoints: Vec<(EdgeKey, StarId, StarId)>,
    selected: Option<StarId>,
}

impl Constellation {
    pub fn new<'a>(
        stars: impl IntoIterator<Item = &'a StarId>,
        edges: impl IntoIterator<Item = &'a [StarId; 2]>,
    ) -> Self {
        let mut endpoints: Vec<(EdgeKey, StarId, StarId)> = edges
            .into_iter()
            .map(|[a, b]| (EdgeKey::new(a, b), a.clone(), b.clone()))
            .collect();
        endpoints.sort_by(|x, y| x.0.cmp(&y.0));
        endpoints.dedup_by(|x, y| x.0 == y.0);

        Self {
            stars: stars.into_iter().cloned().collect(),
            target: endpoints.iter().map(|(key, _, _)| key.clone()).collect(),
            found: BTreeSet::new(),
            endpoints,
            selected: None,
        }
    }

    pub fn select(&mut self, id: &StarId) -> SelectOutcome {
        if self.is_complete() || !self.stars.contains(id) {
            return SelectOutcome::Ignored;
        }

        let Some(armed) = self.selected.take() else {
            self.selected = Some(id.clone());
            return SelectOutcome::Armed(id.clone());
        };

        if &armed == id {
            return SelectOutcome::Disarmed(armed);
        }

        let edge = EdgeKey::new(&armed, id);
        if self.found.contains(&edge) {
            return SelectOutcome::AlreadyFound(edge);
        }
        if self.target.contains(&edge) {
            self.found.insert(edge.clone());
            return SelectOutcome::Found {
                edge,
                found: self.found.len(),
                complete: self.is_complete(),
            };
        }
        SelectOutcome::Rejected(armed, id.clone())
    }

    pub fn selected(&self) -> Option<&StarId> {
        self.selected.as_ref()
    }

    pub fn found(&self) -> &BTreeSet<EdgeKey> {
        &self.found
    }

    /// Endpoints of every connected edge.
    pub fn found_endpoints(&self) -> impl Iterator<Item = (&EdgeKey, &StarId, &StarId)> {
        self.endpoints
            .iter()
            .filter(|(key, _, _)| self.found.contains(key))
            .map(|(key, a, b)| (key, a, b))
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn target_count(&self) -> usize {
        self.target.len()
    }

    pub fn is_complete(&self) -> bool {
        self.found.len() == self.target.len()
    }
}
