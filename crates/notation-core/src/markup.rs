//! Structured data embedded in comment blocks: `[%eval]`, `[%clk]`,
//! `[%csl]` (square highlights) and `[%cal]` (arrows).

use move_quality::Score;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::Square;

/// Color tag carried by a board-overlay marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeColor {
    Green,
    Red,
    Blue,
    Yellow,
}

impl ShapeColor {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'G' => Some(ShapeColor::Green),
            'R' => Some(ShapeColor::Red),
            'B' => Some(ShapeColor::Blue),
            'Y' => Some(ShapeColor::Yellow),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            ShapeColor::Green => 'G',
            ShapeColor::Red => 'R',
            ShapeColor::Blue => 'B',
            ShapeColor::Yellow => 'Y',
        }
    }
}

/// A board-overlay marking: a single-square highlight (`to` absent) or an
/// origin→destination arrow. Squares are kept in coordinate text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawShape {
    pub color: ShapeColor,
    pub from: String,
    pub to: Option<String>,
}

impl DrawShape {
    pub fn is_arrow(&self) -> bool {
        self.to.is_some()
    }

    /// Token form used inside `[%csl]`/`[%cal]` lists, e.g. `Gd4`, `Ge2e4`.
    pub fn token(&self) -> String {
        match &self.to {
            Some(to) => format!("{}{}{}", self.color.letter(), self.from, to),
            None => format!("{}{}", self.color.letter(), self.from),
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let color = ShapeColor::from_letter(chars.next()?)?;
        let rest = chars.as_str();
        if !rest.is_ascii() {
            return None;
        }
        match rest.len() {
            2 => {
                let from: Square = rest.parse().ok()?;
                Some(DrawShape {
                    color,
                    from: from.to_string(),
                    to: None,
                })
            }
            4 => {
                let from: Square = rest[..2].parse().ok()?;
                let to: Square = rest[2..].parse().ok()?;
                Some(DrawShape {
                    color,
                    from: from.to_string(),
                    to: Some(to.to_string()),
                })
            }
            _ => None,
        }
    }
}

/// The structured fields of one comment block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentParts {
    pub eval: Option<Score>,
    pub clock: Option<f64>,
    pub shapes: Vec<DrawShape>,
    pub text: Option<String>,
}

/// Split a raw comment into its bracketed tags and its freeform remainder.
/// Malformed tag payloads are dropped silently.
pub fn parse_comment(raw: &str) -> CommentParts {
    let eval_re = Regex::new(r"\[%eval\s+([^\]\s]+)\]").unwrap();
    let clk_re = Regex::new(r"\[%clk\s+(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)\]").unwrap();
    let csl_re = Regex::new(r"\[%csl\s+([^\]]+)\]").unwrap();
    let cal_re = Regex::new(r"\[%cal\s+([^\]]+)\]").unwrap();
    let any_tag_re = Regex::new(r"\[%[a-zA-Z]+[^\]]*\]").unwrap();

    let mut parts = CommentParts::default();

    if let Some(cap) = eval_re.captures(raw) {
        parts.eval = parse_eval(&cap[1]);
    }
    if let Some(cap) = clk_re.captures(raw) {
        let hours: f64 = cap[1].parse().unwrap_or(0.0);
        let minutes: f64 = cap[2].parse().unwrap_or(0.0);
        let seconds: f64 = cap[3].parse().unwrap_or(0.0);
        parts.clock = Some(hours * 3600.0 + minutes * 60.0 + seconds);
    }
    for cap in csl_re.captures_iter(raw) {
        parts.shapes.extend(
            cap[1]
                .split(',')
                .filter_map(|t| DrawShape::from_token(t.trim()))
                .filter(|s| !s.is_arrow()),
        );
    }
    for cap in cal_re.captures_iter(raw) {
        parts.shapes.extend(
            cap[1]
                .split(',')
                .filter_map(|t| DrawShape::from_token(t.trim()))
                .filter(DrawShape::is_arrow),
        );
    }

    let text = any_tag_re.replace_all(raw, " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        parts.text = Some(text);
    }
    parts
}

fn parse_eval(value: &str) -> Option<Score> {
    if let Some(mate) = value.strip_prefix('#') {
        mate.parse::<i32>().ok().map(Score::Mate)
    } else {
        value
            .parse::<f64>()
            .ok()
            .map(|pawns| Score::Cp((pawns * 100.0).round() as i32))
    }
}

/// Inner value of an `[%eval ...]` tag.
pub fn format_eval(score: Score) -> String {
    match score {
        Score::Mate(n) => format!("#{n}"),
        Score::Cp(v) => format!("{:.2}", f64::from(v) / 100.0),
    }
}

/// Inner value of a `[%clk ...]` tag, `H:MM:SS` with a tenth only when the
/// stored value carries a fraction.
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let h = (seconds / 3600.0).floor() as u64;
    let m = ((seconds % 3600.0) / 60.0).floor() as u64;
    let s = seconds % 60.0;
    if (s - s.floor()).abs() < 1e-9 {
        format!("{}:{:02}:{:02}", h, m, s as u64)
    } else {
        format!("{}:{:02}:{:04.1}", h, m, s)
    }
}
