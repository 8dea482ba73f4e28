use serde::{Deserialize, Serialize};

/// Points scored during the active player's current, uncommitted turn.
///
/// Every addition is logged so the most recent one can be taken back without
/// touching the rest of the turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAccumulator {
    total: i32,
    actions: Vec<i32>,
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point delta. Negative deltas are score corrections and may push
    /// the running total below zero.
    pub fn add_points(&mut self, delta: i32) {
        self.actions.push(delta);
        self.total += delta;
    }

    /// Takes back the most recent delta, if any
    pub fn undo_last_action(&mut self) -> Option<i32> {
        let delta = self.actions.pop()?;
        self.total -= delta;
        Some(delta)
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.actions.clear();
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn actions(&self) -> &[i32] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
