//! Move-quality analysis: engine score model, win-chance math, and the
//! qualitative move classifier used to annotate game trees.

pub mod classifier;
pub mod report;
pub mod score;

pub use classifier::{classify, classify_with, ClassifyThresholds, MoveQuality};
pub use report::{analyze_game, AnalysisReport, EvaluatedMove, MoveReport, QualityCounts};
pub use score::{accuracy, centipawn_loss, win_chance, win_chance_for, Score};
