//! Per-game aggregation of move verdicts and accuracy.

use serde::Serialize;
use shakmaty::Color;

use crate::classifier::{classify_with, ClassifyThresholds, MoveQuality};
use crate::score::{accuracy, centipawn_loss, Score};

/// One analyzed ply as supplied by the evaluation feed: the move played,
/// the evaluation of the resulting position, and the engine's preferred
/// move in the position it was played from.
#[derive(Debug, Clone)]
pub struct EvaluatedMove {
    pub san: String,
    pub eval: Score,
    pub best: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    pub san: String,
    pub quality: Option<MoveQuality>,
    pub cp_loss: i32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityCounts {
    pub best: u32,
    pub brilliant: u32,
    pub good: u32,
    pub interesting: u32,
    pub dubious: u32,
    pub mistake: u32,
    pub blunder: u32,
    pub unmarked: u32,
}

impl QualityCounts {
    fn record(&mut self, quality: Option<MoveQuality>) {
        match quality {
            Some(MoveQuality::Best) => self.best += 1,
            Some(MoveQuality::Brilliant) => self.brilliant += 1,
            Some(MoveQuality::Good) => self.good += 1,
            Some(MoveQuality::Interesting) => self.interesting += 1,
            Some(MoveQuality::Dubious) => self.dubious += 1,
            Some(MoveQuality::Mistake) => self.mistake += 1,
            Some(MoveQuality::Blunder) => self.blunder += 1,
            None => self.unmarked += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub moves: Vec<MoveReport>,
    pub white: QualityCounts,
    pub black: QualityCounts,
    pub white_accuracy: f64,
    pub black_accuracy: f64,
}

/// Game-level accuracy from total centipawn loss over a move count.
fn game_accuracy(total_cp_loss: i32, move_count: u32) -> f64 {
    if move_count == 0 {
        return 100.0;
    }
    let acpl = f64::from(total_cp_loss) / f64::from(move_count);
    (100.0 * (1.0 / (1.0 + acpl / 100.0)).sqrt()).clamp(0.0, 100.0)
}

/// Run the classifier over a whole game.
///
/// `start_eval` is the evaluation of the position before the first move;
/// `first_mover` is the side making that move. Evaluations are consumed in
/// played order, alternating colors.
pub fn analyze_game(
    start_eval: Score,
    first_mover: Color,
    moves: &[EvaluatedMove],
    thresholds: &ClassifyThresholds,
) -> AnalysisReport {
    let mut reports = Vec::with_capacity(moves.len());
    let mut counts = [QualityCounts::default(), QualityCounts::default()];
    let mut cp_totals = [0i32, 0i32];
    let mut move_counts = [0u32, 0u32];

    let mut prev = start_eval;
    let mut color = first_mover;
    for m in moves {
        let is_best = m.best.as_deref() == Some(m.san.as_str());
        let quality = classify_with(thresholds, prev, m.eval, color, &[], is_best, &m.san);
        let cp_loss = centipawn_loss(prev, m.eval, color);
        let acc = accuracy(prev, m.eval, color);

        let side = if color == Color::White { 0 } else { 1 };
        counts[side].record(quality);
        cp_totals[side] += cp_loss;
        move_counts[side] += 1;

        reports.push(MoveReport {
            san: m.san.clone(),
            quality,
            cp_loss,
            accuracy: acc,
        });

        prev = m.eval;
        color = !color;
    }

    let [white, black] = counts;
    AnalysisReport {
        moves: reports,
        white,
        black,
        white_accuracy: game_accuracy(cp_totals[0], move_counts[0]),
        black_accuracy: game_accuracy(cp_totals[1], move_counts[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(san: &str, eval: Score, best: &str) -> EvaluatedMove {
        EvaluatedMove {
            san: san.to_string(),
            eval,
            best: Some(best.to_string()),
        }
    }

    #[test]
    fn test_game_accuracy_bounds() {
        assert!((game_accuracy(0, 20) - 100.0).abs() < 0.1);
        assert!(game_accuracy(500, 20) < 95.0);
        assert!(game_accuracy(20_000, 20) >= 0.0);
        assert_eq!(game_accuracy(0, 0), 100.0);
    }

    #[test]
    fn test_analyze_game_alternates_colors() {
        let moves = vec![
            mv("e4", Score::Cp(30), "e4"),
            mv("e5", Score::Cp(25), "c5"),
            // White hangs a piece.
            mv("Qh5", Score::Cp(-350), "Nf3"),
        ];
        let report = analyze_game(
            Score::Cp(20),
            Color::White,
            &moves,
            &ClassifyThresholds::default(),
        );
        assert_eq!(report.moves.len(), 3);
        assert_eq!(report.white.best, 1);
        assert_eq!(report.white.blunder, 1);
        assert_eq!(report.black.blunder, 0);
        assert!(report.black_accuracy > report.white_accuracy);
    }
}
