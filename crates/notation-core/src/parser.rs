//! Builds a game tree from a token stream.
//!
//! Two modes: `Linear` for a single game with nested variations, and
//! `FlatCollection` for documents holding independent lines with no
//! privileged main line. Unresolvable move tokens are skipped and
//! unmatched parentheses consume to the end of the stream, so a partially
//! corrupt document still yields a best-effort tree.

use shakmaty::san::SanPlus;
use shakmaty::Chess;
use tracing::{debug, warn};

use crate::annotation::Annotation;
use crate::error::ParseError;
use crate::headers::GameHeaders;
use crate::markup::parse_comment;
use crate::token::{tokenize, Token};
use crate::tree::{fen_of, position_from_fen, GameNode, GameTree, STANDARD_START_FEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// One game: first San forms the main line, parenthesized groups are
    /// variations of the move they follow.
    Linear,
    /// A collection of coequal lines: every top-level segment becomes its
    /// own child of the document root.
    FlatCollection,
}

/// Tokenize and parse notation text. An explicit `start_fen` overrides any
/// FEN declared in the headers.
pub fn parse_text(
    text: &str,
    start_fen: Option<&str>,
    mode: ParseMode,
) -> Result<GameTree, ParseError> {
    parse_tokens(&tokenize(text), start_fen, mode)
}

/// Parse an already-tokenized stream.
pub fn parse_tokens(
    tokens: &[Token],
    start_fen: Option<&str>,
    mode: ParseMode,
) -> Result<GameTree, ParseError> {
    let mut headers = GameHeaders::default();
    for token in tokens {
        if let Token::Header(key, value) = token {
            headers.set_tag(key, value);
        }
    }

    let mut tree = match start_fen.or(headers.fen.as_deref()) {
        Some(fen) => GameTree::from_fen(fen)?,
        None => GameTree::starting(),
    };
    tree.headers = headers;
    // Keep the declared FEN in sync with the position actually rooted at,
    // which an explicit override may have replaced.
    tree.headers.fen = if tree.root.fen == STANDARD_START_FEN {
        None
    } else {
        Some(tree.root.fen.clone())
    };

    let movetext: Vec<Token> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Header(..)))
        .cloned()
        .collect();
    debug!(tokens = movetext.len(), ?mode, "parsing token stream");

    match mode {
        ParseMode::Linear => {
            if let Some(result) = parse_sequence(&mut tree.root, &movetext)? {
                tree.headers.result = Some(result);
            }
        }
        ParseMode::FlatCollection => {
            for segment in top_level_segments(&movetext) {
                let mut scratch =
                    GameNode::new(tree.root.fen.clone(), None, None, tree.root.ply);
                if let Some(result) = parse_sequence(&mut scratch, segment)? {
                    tree.headers.result.get_or_insert(result);
                }
                merge_root_notes(&mut tree.root, &mut scratch);
                tree.root.children.append(&mut scratch.children);
            }
        }
    }
    Ok(tree)
}

/// Parse a linear token run into children of `root`, which supplies the
/// starting position and ply. Returns the outcome token, if one terminated
/// the run.
///
/// `cur` tracks the most recently created node and `var_parent` the node a
/// parenthesized group attaches to — the position its first move starts
/// from, which is the parent of the move the text just passed. Both are
/// paths relative to `root`, so the recursion stays free of aliasing.
fn parse_sequence(root: &mut GameNode, tokens: &[Token]) -> Result<Option<String>, ParseError> {
    let mut pos = position_from_fen(&root.fen)?;
    let mut cur: Vec<usize> = Vec::new();
    let mut var_parent: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::San(text) => {
                i += 1;
                match resolve_san(&pos, text) {
                    Some((mv, canonical, next)) => {
                        let parent = node_at_mut(root, &cur);
                        let child = GameNode::new(
                            fen_of(&next),
                            Some(mv),
                            Some(canonical),
                            parent.ply + 1,
                        );
                        parent.children.push(child);
                        let index = parent.children.len() - 1;
                        var_parent = cur.clone();
                        cur.push(index);
                        pos = next;
                    }
                    None => warn!(token = %text, "skipping unresolvable move token"),
                }
            }
            Token::ParenOpen => {
                let (inner, consumed) = variation_span(&tokens[i + 1..]);
                i += 1 + consumed;
                let (start_fen, start_ply) = {
                    let vp = node_at(root, &var_parent);
                    (vp.fen.clone(), vp.ply)
                };
                let mut scratch = GameNode::new(start_fen, None, None, start_ply);
                parse_sequence(&mut scratch, inner)?;
                let vp = node_at_mut(root, &var_parent);
                vp.children.append(&mut scratch.children);
            }
            Token::ParenClose => {
                warn!("stray closing parenthesis in token stream");
                i += 1;
            }
            Token::Comment(text) => {
                apply_comment(node_at_mut(root, &cur), text);
                i += 1;
            }
            Token::Nag(code) => {
                node_at_mut(root, &cur).add_annotation(Annotation::from_nag(*code));
                i += 1;
            }
            Token::Header(..) => {
                i += 1;
            }
            Token::Outcome(result) => return Ok(Some(result.clone())),
        }
    }
    Ok(None)
}

/// The tokens of one parenthesized group, nested parens kept intact, plus
/// the count consumed including the matching close.
fn variation_span(tokens: &[Token]) -> (&[Token], usize) {
    let mut depth = 1usize;
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::ParenOpen => depth += 1,
            Token::ParenClose => {
                depth -= 1;
                if depth == 0 {
                    return (&tokens[..index], index + 1);
                }
            }
            _ => {}
        }
    }
    warn!("unterminated variation; consuming to end of stream");
    (tokens, tokens.len())
}

/// Split a stream into maximal segments at top-level parenthesis
/// boundaries. Each group is its own segment; so is every unparenthesized
/// run between groups.
fn top_level_segments(tokens: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == Token::ParenOpen {
            if i > start {
                segments.push(&tokens[start..i]);
            }
            let (inner, consumed) = variation_span(&tokens[i + 1..]);
            if !inner.is_empty() {
                segments.push(inner);
            }
            i += 1 + consumed;
            start = i;
        } else {
            i += 1;
        }
    }
    if start < tokens.len() {
        segments.push(&tokens[start..]);
    }
    segments
}

/// Carry notes parsed onto a segment's scratch root (a comment, tag, or
/// glyph before the segment's first move) over to the document root, the
/// node they describe.
fn merge_root_notes(root: &mut GameNode, scratch: &mut GameNode) {
    if scratch.eval.is_some() {
        root.eval = scratch.eval.take();
    }
    if scratch.clock.is_some() {
        root.clock = scratch.clock.take();
    }
    root.shapes.append(&mut scratch.shapes);
    for annotation in scratch.annotations.drain(..) {
        root.add_annotation(annotation);
    }
    if let Some(text) = scratch.comment.take() {
        match &mut root.comment {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&text);
            }
            None => root.comment = Some(text),
        }
    }
}

/// Resolve a SAN token against a position: the move, its canonical text,
/// and the resulting position. `None` when the token is unparseable or
/// illegal.
fn resolve_san(pos: &Chess, text: &str) -> Option<(shakmaty::Move, String, Chess)> {
    let san_plus: SanPlus = text.parse().ok()?;
    let mv = san_plus.san.to_move(pos).ok()?;
    let mut next = pos.clone();
    let canonical = SanPlus::from_move_and_play_unchecked(&mut next, mv).to_string();
    Some((mv, canonical, next))
}

fn apply_comment(node: &mut GameNode, raw: &str) {
    let parts = parse_comment(raw);
    if parts.eval.is_some() {
        node.eval = parts.eval;
    }
    if parts.clock.is_some() {
        node.clock = parts.clock;
    }
    node.shapes.extend(parts.shapes);
    if let Some(text) = parts.text {
        match &mut node.comment {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&text);
            }
            None => node.comment = Some(text),
        }
    }
}

fn node_at<'a>(root: &'a GameNode, path: &[usize]) -> &'a GameNode {
    path.iter().fold(root, |node, &index| &node.children[index])
}

fn node_at_mut<'a>(root: &'a mut GameNode, path: &[usize]) -> &'a mut GameNode {
    path.iter()
        .fold(root, |node, &index| &mut node.children[index])
}
