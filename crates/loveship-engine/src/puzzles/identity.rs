use serde::Serialize;

use crate::core::session::{SessionStore, VISITOR_NAME_KEY};

/// The visitor, once recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorIdentity {
    /// The name as typed, original casing preserved for display.
    pub name: String,
    /// True when the identity was restored from storage rather than typed.
    pub resume_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Accepted(VisitorIdentity),
    Rejected,
}

/// Recognises the one expected visitor by name.
///
/// Not authentication: a single hard-coded value compared after trimming,
/// without regard to case.
#[derive(Debug, Clone)]
pub struct IdentityGate {
    accepted: String,
}

impl IdentityGate {
    pub fn new(accepted_name: &str) -> Self {
        Self {
            accepted: accepted_name.trim().to_lowercase(),
        }
    }

    pub fn accepts(&self, raw_name: &str) -> bool {
        raw_name.trim().to_lowercase() == self.accepted
    }

    /// Check a typed name and persist it verbatim when accepted.
    ///
    /// A failed write is logged; the visitor is still let through.
    pub fn submit(&self, raw_name: &str, store: &mut dyn SessionStore) -> GateOutcome {
        if !self.accepts(raw_name) {
            log::debug!("identity: rejected name");
            return GateOutcome::Rejected;
        }
        if let Err(err) = store.set(VISITOR_NAME_KEY, raw_name) {
            log::warn!("identity: could not persist visitor name: {}", err);
        }
        log::info!("identity: accepted '{}'", raw_name.trim());
        GateOutcome::Accepted(VisitorIdentity {
            name: raw_name.to_string(),
            resume_enabled: false,
        })
    }

    /// Restore a previously accepted visitor, if the stored name still passes.
    pub fn resume(&self, store: &dyn SessionStore) -> Option<VisitorIdentity> {
        let name = store.get(VISITOR_NAME_KEY)?;
        if !self.accepts(&name) {
            return None;
        }
        log::info!("identity: resuming as '{}'", name.trim());
        Some(VisitorIdentity {
            name,
            resume_enabled: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::MemoryStore;

    #[test]
    fn accepts_trimmed_case_insensitive_name() {
        let gate = IdentityGate::new("victoria");
        assert!(gate.accepts("Victoria"));
        assert!(gate.accepts("  VICTORIA \n"));
        assert!(!gate.accepts("Victor"));
        assert!(!gate.accepts(""));
    }

    #[test]
    fn accepted_name_is_persisted_verbatim() {
        let gate = IdentityGate::new("victoria");
        let mut store = MemoryStore::new();
        let outcome = gate.submit(" ViCtoria ", &mut store);
        assert_eq!(
            outcome,
            GateOutcome::Accepted(VisitorIdentity {
                name: " ViCtoria ".to_string(),
                resume_enabled: false,
            })
        );
        assert_eq!(store.get(VISITOR_NAME_KEY).as_deref(), Some(" ViCtoria "));
    }

    #[test]
    fn rejection_does_not_touch_store() {
        let gate = IdentityGate::new("victoria");
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            assert_eq!(gate.submit("Someone", &mut store), GateOutcome::Rejected);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn resume_requires_matching_stored_name() {
        let gate = IdentityGate::new("victoria");

        let store = MemoryStore::new().with_entry(VISITOR_NAME_KEY, "Victoria");
        let identity = gate.resume(&store).unwrap();
        assert_eq!(identity.name, "Victoria");
        assert!(identity.resume_enabled);

        let store = MemoryStore::new().with_entry(VISITOR_NAME_KEY, "Mallory");
        assert!(gate.resume(&store).is_none());

        assert!(gate.resume(&MemoryStore::new()).is_none());
    }
}
