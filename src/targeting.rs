// Target ordering for border cells
//
// Early in the game the weakest neighbour is taken; later the bot switches to
// the pressure/opportunity score popularised by the Overkill bot. Both sort
// ascending and take the first candidate.

use std::cmp::Ordering;

use crate::types::CellDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOrdering {
    /// Weakest neighbour first
    MinStrength,
    /// Opportunity score for neutral cells, reinforcement for hostile ones
    PressureScore,
}

impl TargetOrdering {
    /// Picks the ordering for the current game phase
    ///
    /// # Arguments
    /// * `turn` - Frames seen so far, starting at 1
    /// * `estimated_turns` - Expected game length
    /// * `phase_fraction` - Share of the game played with `MinStrength`
    pub fn for_turn(turn: u32, estimated_turns: u32, phase_fraction: f64) -> Self {
        if turn as f64 > estimated_turns as f64 * phase_fraction {
            TargetOrdering::PressureScore
        } else {
            TargetOrdering::MinStrength
        }
    }

    /// Sort key of one candidate, smaller sorts first
    ///
    /// `reinforcement` is only called for candidates scored by the hostile
    /// branch of `PressureScore`; it must return the summed strength of the
    /// candidate's neighbours held by other players.
    pub fn key<F>(&self, candidate: &CellDetail, reinforcement: F) -> f64
    where
        F: FnOnce(&CellDetail) -> u32,
    {
        match self {
            TargetOrdering::MinStrength => candidate.strength as f64,
            TargetOrdering::PressureScore => {
                if candidate.is_unclaimed() && candidate.strength > 0 {
                    opportunity_score(candidate.production, candidate.strength)
                } else {
                    reinforcement(candidate) as f64
                }
            }
        }
    }

    /// Stable ascending sort by `key`, returns the first candidate
    pub fn pick<F>(&self, candidates: Vec<CellDetail>, mut reinforcement: F) -> Option<CellDetail>
    where
        F: FnMut(&CellDetail) -> u32,
    {
        let mut keyed: Vec<(f64, CellDetail)> = candidates
            .into_iter()
            .map(|c| (self.key(&c, &mut reinforcement), c))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().next().map(|(_, c)| c)
    }
}

/// `(production² + 1) / (strength + 1)` for an unclaimed cell
pub fn opportunity_score(production: u8, strength: u8) -> f64 {
    let production = production as f64;
    (production * production + 1.0) / (strength as f64 + 1.0)
}
