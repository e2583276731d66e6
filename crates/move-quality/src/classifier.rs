//! Qualitative move classification from consecutive engine evaluations.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::score::{centipawn_loss, win_chance_for, Score};

/// The seven mutually-exclusive basic quality markers.
///
/// The derive order doubles as the display priority when annotations are
/// sorted on a node, and matches the standard NAG codes via [`MoveQuality::nag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    Brilliant,
    Good,
    Interesting,
    Dubious,
    Mistake,
    Blunder,
    Best,
}

impl MoveQuality {
    /// Numeric annotation glyph code. `Best` has no suffix form, so it owns
    /// a dedicated code of its own.
    pub fn nag(self) -> u16 {
        match self {
            MoveQuality::Good => 1,
            MoveQuality::Mistake => 2,
            MoveQuality::Brilliant => 3,
            MoveQuality::Blunder => 4,
            MoveQuality::Interesting => 5,
            MoveQuality::Dubious => 6,
            MoveQuality::Best => 7,
        }
    }

    pub fn from_nag(code: u16) -> Option<Self> {
        match code {
            1 => Some(MoveQuality::Good),
            2 => Some(MoveQuality::Mistake),
            3 => Some(MoveQuality::Brilliant),
            4 => Some(MoveQuality::Blunder),
            5 => Some(MoveQuality::Interesting),
            6 => Some(MoveQuality::Dubious),
            7 => Some(MoveQuality::Best),
            _ => None,
        }
    }

    /// Suffix glyph appended to a SAN string, empty for `Best`.
    pub fn suffix(self) -> &'static str {
        match self {
            MoveQuality::Brilliant => "!!",
            MoveQuality::Good => "!",
            MoveQuality::Interesting => "!?",
            MoveQuality::Dubious => "?!",
            MoveQuality::Mistake => "?",
            MoveQuality::Blunder => "??",
            MoveQuality::Best => "",
        }
    }

    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "!!" => Some(MoveQuality::Brilliant),
            "!" => Some(MoveQuality::Good),
            "!?" => Some(MoveQuality::Interesting),
            "?!" => Some(MoveQuality::Dubious),
            "?" => Some(MoveQuality::Mistake),
            "??" => Some(MoveQuality::Blunder),
            _ => None,
        }
    }
}

/// Classification thresholds. Win-chance values are on the 0–100 scale,
/// centipawn values on the raw cp scale.
///
/// The bad-move side is calibrated against known blunder/mistake corpora;
/// the good-move side is intentionally conservative and only fires on clear
/// evaluation jumps (see `!`/`!!` note in DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyThresholds {
    pub blunder_wc_drop: f64,
    pub mistake_wc_drop: f64,
    pub dubious_wc_drop: f64,
    pub blunder_cp_loss: i32,
    pub mistake_cp_loss: i32,
    pub dubious_cp_loss: i32,
    /// Win chance below which a position counts as already lost, softening
    /// raw-centipawn verdicts.
    pub losing_floor_wc: f64,
    pub interesting_wc_gain: f64,
    pub good_wc_gain: f64,
    pub brilliant_wc_gain: f64,
}

impl Default for ClassifyThresholds {
    fn default() -> Self {
        Self {
            blunder_wc_drop: 25.0,
            mistake_wc_drop: 15.0,
            dubious_wc_drop: 8.0,
            blunder_cp_loss: 300,
            mistake_cp_loss: 150,
            dubious_cp_loss: 60,
            losing_floor_wc: 10.0,
            interesting_wc_gain: 6.0,
            good_wc_gain: 12.0,
            brilliant_wc_gain: 22.0,
        }
    }
}

/// Classify the move `color` just played, with default thresholds.
///
/// `prev` is the evaluation of the position before the move, `played` the
/// evaluation after it. `alternatives` are the engine's candidate moves in
/// preference order; a move matching the top candidate (or an explicit
/// `is_best`) short-circuits to `Best`. Returns `None` for an unremarkable
/// move.
pub fn classify(
    prev: Score,
    played: Score,
    color: Color,
    alternatives: &[String],
    is_best: bool,
    played_san: &str,
) -> Option<MoveQuality> {
    classify_with(
        &ClassifyThresholds::default(),
        prev,
        played,
        color,
        alternatives,
        is_best,
        played_san,
    )
}

/// Classify with explicit thresholds. Rules are evaluated most severe
/// first; each compares the raw centipawn regression and the win-chance
/// regression against its thresholds, with raw-cp verdicts gated on the
/// position not being already lost.
pub fn classify_with(
    t: &ClassifyThresholds,
    prev: Score,
    played: Score,
    color: Color,
    alternatives: &[String],
    is_best: bool,
    played_san: &str,
) -> Option<MoveQuality> {
    if is_best || alternatives.first().map(String::as_str) == Some(played_san) {
        return Some(MoveQuality::Best);
    }

    let wc_before = win_chance_for(prev, color);
    let wc_after = win_chance_for(played, color);
    let drop = wc_before - wc_after;
    let cp_loss = centipawn_loss(prev, played, color);
    let already_lost = wc_before < t.losing_floor_wc;

    if drop >= t.blunder_wc_drop || (cp_loss >= t.blunder_cp_loss && !already_lost) {
        return Some(MoveQuality::Blunder);
    }
    if drop >= t.mistake_wc_drop || (cp_loss >= t.mistake_cp_loss && !already_lost) {
        return Some(MoveQuality::Mistake);
    }
    if drop >= t.dubious_wc_drop || (cp_loss >= t.dubious_cp_loss && !already_lost) {
        return Some(MoveQuality::Dubious);
    }

    let gain = -drop;
    if gain >= t.brilliant_wc_gain {
        return Some(MoveQuality::Brilliant);
    }
    if gain >= t.good_wc_gain {
        return Some(MoveQuality::Good);
    }
    if gain >= t.interesting_wc_gain {
        return Some(MoveQuality::Interesting);
    }

    None
}
