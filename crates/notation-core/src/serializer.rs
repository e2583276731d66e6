//! Regenerates notation text from a game tree.
//!
//! Variations are emitted as parenthesized groups immediately after the
//! move they branch from, at every recursion depth, with the main line
//! resuming afterwards. Serialization is total: any well-formed tree
//! produces text.

use move_quality::MoveQuality;

use crate::annotation::Annotation;
use crate::markup::{format_clock, format_eval};
use crate::tree::{GameNode, GameTree, STANDARD_START_FEN};

/// What the produced text includes. `markup` controls the bracketed
/// `[%eval]`/`[%clk]`/`[%csl]`/`[%cal]` tags independently of freeform
/// `comments`. A `path` renders only that line, suppressing variation
/// branching at every depth. `flat` emits every top-level line as its own
/// parenthesized group, the coequal-lines form that re-segments
/// identically under a flat-collection parse.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    pub headers: bool,
    pub comments: bool,
    pub symbols: bool,
    pub markup: bool,
    pub variations: bool,
    pub flat: bool,
    pub path: Option<Vec<usize>>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            headers: true,
            comments: true,
            symbols: true,
            markup: false,
            variations: true,
            flat: false,
            path: None,
        }
    }
}

pub fn serialize(tree: &GameTree, opts: &SerializeOptions) -> String {
    let mut out = String::new();

    if opts.headers {
        for (key, value) in tree.headers.tag_pairs() {
            out.push_str(&format!("[{key} \"{value}\"]\n"));
        }
        if tree.root.fen != STANDARD_START_FEN {
            out.push_str("[SetUp \"1\"]\n");
            out.push_str(&format!("[FEN \"{}\"]\n", tree.root.fen));
        }
        out.push('\n');
    }

    // Pre-game comment block belongs to the root node.
    write_comment_block(&tree.root, opts, &mut out);
    if opts.flat && opts.variations && opts.path.is_none() {
        for line in &tree.root.children {
            out.push('(');
            let inner = write_move(line, opts, &mut out, true);
            write_line(line, opts, None, &mut out, inner);
            if out.ends_with(' ') {
                out.pop();
            }
            out.push_str(" ) ");
        }
    } else {
        write_line(&tree.root, opts, opts.path.as_deref(), &mut out, true);
    }

    out.push_str(tree.headers.result.as_deref().unwrap_or("*"));
    out
}

/// Walk a main line from `parent` downwards, interleaving each move with
/// the variation groups that branch from the same position.
fn write_line(
    parent: &GameNode,
    opts: &SerializeOptions,
    mut path: Option<&[usize]>,
    out: &mut String,
    mut force_number: bool,
) {
    let mut parent = parent;
    loop {
        if parent.children.is_empty() {
            break;
        }
        let (main_index, rest) = match path {
            Some(p) if !p.is_empty() => {
                let index = if p[0] < parent.children.len() { p[0] } else { 0 };
                (index, Some(&p[1..]))
            }
            Some(_) => (0, Some(&[][..])),
            None => (0, None),
        };
        let main = &parent.children[main_index];

        let interrupted = write_move(main, opts, out, force_number);
        force_number = interrupted;

        if path.is_none() && opts.variations && parent.children.len() > 1 {
            for (index, variation) in parent.children.iter().enumerate() {
                if index == main_index {
                    continue;
                }
                out.push('(');
                let inner = write_move(variation, opts, out, true);
                write_line(variation, opts, None, out, inner);
                if out.ends_with(' ') {
                    out.pop();
                }
                out.push_str(" ) ");
            }
            force_number = true;
        }

        parent = main;
        path = rest;
    }
}

/// Emit one move with its number, glyphs, and comment block. Returns true
/// when the move text was followed by material that requires renumbering a
/// black continuation.
fn write_move(node: &GameNode, opts: &SerializeOptions, out: &mut String, force_number: bool) -> bool {
    let white_moved = node.ply % 2 == 1;
    let number = (node.ply + 1) / 2;
    if white_moved {
        out.push_str(&format!("{number}. "));
    } else if force_number {
        out.push_str(&format!("{number}... "));
    }

    if let Some(san) = &node.san {
        out.push_str(san);
    }
    if opts.symbols {
        if let Some(q) = node.quality() {
            if q != MoveQuality::Best {
                out.push_str(q.suffix());
            }
        }
    }
    out.push(' ');

    if opts.symbols {
        if node.quality() == Some(MoveQuality::Best) {
            out.push_str(&format!("${} ", MoveQuality::Best.nag()));
        }
        for annotation in &node.annotations {
            if let Annotation::Glyph(code) = annotation {
                out.push_str(&format!("${code} "));
            }
        }
    }

    write_comment_block(node, opts, out)
}

/// Emit the bracketed-tag/comment block for a node, if anything is
/// requested and present. Returns whether a block was written.
fn write_comment_block(node: &GameNode, opts: &SerializeOptions, out: &mut String) -> bool {
    let mut parts: Vec<String> = Vec::new();
    if opts.markup {
        if let Some(eval) = node.eval {
            parts.push(format!("[%eval {}]", format_eval(eval)));
        }
        if let Some(clock) = node.clock {
            parts.push(format!("[%clk {}]", format_clock(clock)));
        }
        let highlights: Vec<String> = node
            .shapes
            .iter()
            .filter(|s| !s.is_arrow())
            .map(|s| s.token())
            .collect();
        if !highlights.is_empty() {
            parts.push(format!("[%csl {}]", highlights.join(",")));
        }
        let arrows: Vec<String> = node
            .shapes
            .iter()
            .filter(|s| s.is_arrow())
            .map(|s| s.token())
            .collect();
        if !arrows.is_empty() {
            parts.push(format!("[%cal {}]", arrows.join(",")));
        }
    }
    if opts.comments {
        if let Some(text) = &node.comment {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
    }
    if parts.is_empty() {
        return false;
    }
    out.push_str(&format!("{{ {} }} ", parts.join(" ")));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_text, ParseMode};

    fn roundtrip(text: &str) -> GameTree {
        parse_text(text, None, ParseMode::Linear).unwrap()
    }

    fn bare_opts() -> SerializeOptions {
        SerializeOptions {
            headers: false,
            comments: false,
            markup: false,
            ..SerializeOptions::default()
        }
    }

    #[test]
    fn test_main_line_with_root_variation() {
        let tree = roundtrip("1. e4 (1. d4) e5");
        let text = serialize(&tree, &bare_opts());
        assert!(text.contains("1. e4 (1. d4 )"), "got: {text}");
        // Main line resumes after the group, renumbered.
        assert!(text.contains(") 1... e5"), "got: {text}");
    }

    #[test]
    fn test_headers_block_and_result() {
        let mut tree = roundtrip("1. e4 e5 1-0");
        tree.headers.white = Some("Alice".into());
        tree.headers.black = Some("Bob".into());
        let text = serialize(&tree, &SerializeOptions::default());
        assert!(text.starts_with("[White \"Alice\"]\n[Black \"Bob\"]\n[Result \"1-0\"]\n\n"));
        assert!(text.trim_end().ends_with("1-0"));
    }

    #[test]
    fn test_nonstandard_root_gets_setup_tags() {
        let tree = parse_text(
            "[FEN \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1\"]\n1... e5",
            None,
            ParseMode::Linear,
        )
        .unwrap();
        let text = serialize(&tree, &SerializeOptions::default());
        assert!(text.contains("[SetUp \"1\"]"));
        assert!(text.contains("[FEN \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1\"]"));
        assert!(text.contains("1... e5"));
    }

    #[test]
    fn test_comments_and_markup_are_independent() {
        let tree = roundtrip("1. e4 {[%eval 0.30] [%clk 0:05:00] a fine start} e5");
        let mut opts = bare_opts();

        opts.comments = true;
        let text = serialize(&tree, &opts);
        assert!(text.contains("{ a fine start }"), "got: {text}");
        assert!(!text.contains("[%eval"));

        opts.comments = false;
        opts.markup = true;
        let text = serialize(&tree, &opts);
        assert!(text.contains("[%eval 0.30]"), "got: {text}");
        assert!(text.contains("[%clk 0:05:00]"), "got: {text}");
        assert!(!text.contains("a fine start"));
    }

    #[test]
    fn test_symbols_suffix_and_best_code() {
        let tree = roundtrip("1. e4 $7 e5 $6 2. Nf3 $13");
        let text = serialize(&tree, &bare_opts());
        assert!(text.contains("1. e4 $7"), "got: {text}");
        assert!(text.contains("e5?!"), "got: {text}");
        assert!(text.contains("Nf3 $13"), "got: {text}");

        let mut opts = bare_opts();
        opts.symbols = false;
        let text = serialize(&tree, &opts);
        assert!(!text.contains('$'));
        assert!(!text.contains("?!"));
    }

    #[test]
    fn test_black_move_renumbered_after_comment() {
        let tree = roundtrip("1. e4 {center} e5 2. Nf3");
        let mut opts = bare_opts();
        opts.comments = true;
        let text = serialize(&tree, &opts);
        assert!(text.contains("1. e4 { center } 1... e5 2. Nf3"), "got: {text}");
    }

    #[test]
    fn test_path_constraint_suppresses_variations() {
        let tree = roundtrip("1. e4 (1. d4 d5) e5 (1... c5) 2. Nf3");
        let mut opts = bare_opts();
        opts.path = Some(vec![1, 0]);
        let text = serialize(&tree, &opts);
        assert!(text.contains("1. d4 d5"), "got: {text}");
        assert!(!text.contains('('));

        opts.path = Some(vec![0]);
        let text = serialize(&tree, &opts);
        // Constraint exhausted below e4: falls back to the main line,
        // still with no branching.
        assert!(text.contains("1. e4 e5 2. Nf3"), "got: {text}");
        assert!(!text.contains('('));
    }

    #[test]
    fn test_deeply_nested_interleaving() {
        let tree = roundtrip("1. e4 e5 (1... c5 2. Nf3 (2. c3 d5) d6) 2. Bc4");
        let text = serialize(&tree, &bare_opts());
        assert!(
            text.contains("1. e4 e5 (1... c5 2. Nf3 (2. c3 d5 ) 2... d6 ) 2. Bc4"),
            "got: {text}"
        );
    }

    #[test]
    fn test_flat_emission_parenthesizes_every_line() {
        let tree = parse_text(
            "1. e4 e5 (1. d4 d5) 1. c4",
            None,
            ParseMode::FlatCollection,
        )
        .unwrap();
        let mut opts = bare_opts();
        opts.flat = true;
        let text = serialize(&tree, &opts);
        assert!(text.contains("(1. e4 e5 )"), "got: {text}");
        assert!(text.contains("(1. d4 d5 )"), "got: {text}");
        assert!(text.contains("(1. c4 )"), "got: {text}");
    }

    #[test]
    fn test_empty_tree_serializes_to_result_only() {
        let tree = GameTree::starting();
        let text = serialize(&tree, &bare_opts());
        assert_eq!(text.trim(), "*");
    }
}
