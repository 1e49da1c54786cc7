//! Beat rewards raised by exceptional successes and dramatic failures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::provider::{RewardKind, RewardSink};

/// A single beat award.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatAward {
    /// Who earned the beat.
    pub actor: ActorId,
    /// What earned it.
    pub kind: RewardKind,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Counts beats per actor and keeps a chronological log of awards.
#[derive(Debug, Clone, Default)]
pub struct BeatLedger {
    totals: HashMap<ActorId, u32>,
    log: Vec<BeatAward>,
}

impl BeatLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total beats earned by an actor.
    pub fn beats(&self, actor: ActorId) -> u32 {
        self.totals.get(&actor).copied().unwrap_or(0)
    }

    /// All awards in the order they were raised.
    pub fn awards(&self) -> &[BeatAward] {
        &self.log
    }

    /// Awards of one kind for one actor.
    pub fn count(&self, actor: ActorId, kind: RewardKind) -> usize {
        self.log
            .iter()
            .filter(|a| a.actor == actor && a.kind == kind)
            .count()
    }
}

impl RewardSink for BeatLedger {
    fn emit(&mut self, actor: ActorId, kind: RewardKind) {
        *self.totals.entry(actor).or_default() += 1;
        self.log.push(BeatAward {
            actor,
            kind,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_event_is_one_beat() {
        let mut ledger = BeatLedger::new();
        let kael = ActorId::new();
        let soma = ActorId::new();

        ledger.emit(kael, RewardKind::ExceptionalSuccess);
        ledger.emit(kael, RewardKind::DramaticFailure);
        ledger.emit(soma, RewardKind::ExceptionalSuccess);

        assert_eq!(ledger.beats(kael), 2);
        assert_eq!(ledger.beats(soma), 1);
        assert_eq!(ledger.count(kael, RewardKind::DramaticFailure), 1);
        assert_eq!(ledger.awards().len(), 3);
        assert_eq!(ledger.awards()[2].actor, soma);
    }

    #[test]
    fn unknown_actor_has_no_beats() {
        assert_eq!(BeatLedger::new().beats(ActorId::new()), 0);
    }
}
