//! Engine score representation and derived metrics (win chance, centipawn
//! loss, accuracy) — pure functions only.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Centipawn value a mate score is pinned to when compared on the cp scale.
const MATE_CP: i32 = 10_000;

/// Centipawn magnitude beyond which the win-chance curve is saturated.
const WIN_CHANCE_CP_CEILING: f64 = 1_000.0;

/// Cap on a single move's centipawn loss.
const MAX_CP_LOSS: i32 = 1_000;

/// Steepness of the centipawn-to-win-chance logistic.
const WIN_CHANCE_K: f64 = 0.003_682_08;

/// An engine evaluation, always from White's perspective.
///
/// `Cp` is a centipawn value; `Mate` is a signed ply count to forced mate
/// (positive: White mates, negative: Black mates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    /// Collapse onto the centipawn scale, pinning mates near `±MATE_CP` so
    /// that a shorter mate still compares as better than a longer one.
    pub fn as_cp(self) -> i32 {
        match self {
            Score::Cp(v) => v.clamp(-MATE_CP, MATE_CP),
            Score::Mate(n) if n >= 0 => MATE_CP - n.min(MATE_CP / 2),
            Score::Mate(n) => -MATE_CP - n.max(-MATE_CP / 2),
        }
    }

    pub fn is_mate(self) -> bool {
        matches!(self, Score::Mate(_))
    }
}

/// Win chance for White on a 0–100 scale.
///
/// Logistic transform of the centipawn value; mate scores saturate to the
/// extremes regardless of distance.
pub fn win_chance(score: Score) -> f64 {
    match score {
        Score::Mate(n) if n >= 0 => 100.0,
        Score::Mate(_) => 0.0,
        Score::Cp(v) => {
            let cp = (v as f64).clamp(-WIN_CHANCE_CP_CEILING, WIN_CHANCE_CP_CEILING);
            50.0 + 50.0 * (2.0 / (1.0 + (-WIN_CHANCE_K * cp).exp()) - 1.0)
        }
    }
}

/// Win chance for the given side, 0–100.
pub fn win_chance_for(score: Score, color: Color) -> f64 {
    match color {
        Color::White => win_chance(score),
        Color::Black => 100.0 - win_chance(score),
    }
}

/// Centipawn regression caused by the move `color` just played, clamped to
/// `0..=MAX_CP_LOSS`. `before` is the evaluation of the position the move
/// was played from, `after` the evaluation of the resulting position.
pub fn centipawn_loss(before: Score, after: Score, color: Color) -> i32 {
    let loss = match color {
        Color::White => before.as_cp() - after.as_cp(),
        Color::Black => after.as_cp() - before.as_cp(),
    };
    loss.clamp(0, MAX_CP_LOSS)
}

/// Single-move accuracy on a 0–100 scale, derived from the win-chance drop
/// attributable to the side that just moved.
pub fn accuracy(before: Score, after: Score, color: Color) -> f64 {
    let drop = (win_chance_for(before, color) - win_chance_for(after, color)).max(0.0);
    (103.1668 * (-0.04354 * drop).exp() - 3.1669).clamp(0.0, 100.0)
}
