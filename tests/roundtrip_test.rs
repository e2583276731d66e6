//! Integration tests: parse → serialize → parse round trips.
//!
//! The round trip is checked semantically (moves, variation structure,
//! annotations, comments, markup), not byte-for-byte: whitespace and move
//! number placement are allowed to differ between input and output.

use notation_core::{
    parse_text, serialize, GameNode, GameTree, ParseMode, SerializeOptions,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse(text: &str, mode: ParseMode) -> GameTree {
    parse_text(text, None, mode).expect("parse failed")
}

fn full_opts() -> SerializeOptions {
    SerializeOptions {
        markup: true,
        ..SerializeOptions::default()
    }
}

fn flat_opts() -> SerializeOptions {
    SerializeOptions {
        markup: true,
        flat: true,
        ..SerializeOptions::default()
    }
}

/// Structural equivalence of two subtrees.
fn assert_nodes_eq(a: &GameNode, b: &GameNode, at: &str) {
    assert_eq!(a.san, b.san, "san differs at {at}");
    assert_eq!(a.ply, b.ply, "ply differs at {at}");
    assert_eq!(a.fen, b.fen, "fen differs at {at}");
    assert_eq!(a.annotations, b.annotations, "annotations differ at {at}");
    assert_eq!(a.comment, b.comment, "comment differs at {at}");
    assert_eq!(a.eval, b.eval, "eval differs at {at}");
    assert_eq!(a.clock, b.clock, "clock differs at {at}");
    assert_eq!(a.shapes, b.shapes, "shapes differ at {at}");
    assert_eq!(
        a.children.len(),
        b.children.len(),
        "child count differs at {at}"
    );
    for (i, (ca, cb)) in a.children.iter().zip(&b.children).enumerate() {
        assert_nodes_eq(ca, cb, &format!("{at}/{i}"));
    }
}

fn assert_round_trip(text: &str, mode: ParseMode) {
    let first = parse(text, mode);
    let emitted = serialize(&first, &full_opts());
    let second = parse(&emitted, mode);
    assert_nodes_eq(&first.root, &second.root, "root");
    assert_eq!(first.headers, second.headers, "headers differ\n{emitted}");

    // Serializing again must be a fixed point.
    let emitted_again = serialize(&second, &full_opts());
    assert_eq!(emitted, emitted_again);
}

// ---------------------------------------------------------------------------
// Linear mode
// ---------------------------------------------------------------------------

#[test]
fn round_trip_plain_game() {
    assert_round_trip("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 1-0", ParseMode::Linear);
}

#[test]
fn round_trip_variations() {
    assert_round_trip(
        "1. e4 e5 (1... c5 2. Nf3 d6 (2... Nc6)) (1... e6) 2. Nf3 Nc6 *",
        ParseMode::Linear,
    );
}

#[test]
fn round_trip_comments_nags_markup() {
    assert_round_trip(
        "{pre-game note} 1. e4 $1 {[%eval 0.30] [%clk 0:05:00] the classic} e5 $6 $14 \
         (1... c5 {[%csl Gd4,Rc5] [%cal Ge2e4]}) 2. Nf3 $7 1/2-1/2",
        ParseMode::Linear,
    );
}

#[test]
fn round_trip_headers_and_custom_start() {
    assert_round_trip(
        "[Event \"Club championship\"]\n\
         [White \"Alice\"]\n\
         [Black \"Bob\"]\n\
         [WhiteElo \"1900\"]\n\
         [Result \"0-1\"]\n\
         [SetUp \"1\"]\n\
         [FEN \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1\"]\n\
         \n\
         1... e5 2. Nf3 Nc6 0-1",
        ParseMode::Linear,
    );
}

#[test]
fn round_trip_suffix_glyphs() {
    // Suffix glyphs on input come back as equivalent annotations.
    let first = parse("1. e4!? e5?? 2. Qh5?! *", ParseMode::Linear);
    let emitted = serialize(&first, &full_opts());
    let second = parse(&emitted, ParseMode::Linear);
    assert_nodes_eq(&first.root, &second.root, "root");
}

// ---------------------------------------------------------------------------
// Flat-collection mode
// ---------------------------------------------------------------------------

#[test]
fn round_trip_flat_collection() {
    let text = "1. e4 e5 (1. d4 d5 2. c4) 1. c4 c5 *";
    let first = parse(text, ParseMode::FlatCollection);
    assert_eq!(first.root.children.len(), 3);

    let emitted = serialize(&first, &flat_opts());
    let second = parse(&emitted, ParseMode::FlatCollection);
    assert_nodes_eq(&first.root, &second.root, "root");

    let emitted_again = serialize(&second, &flat_opts());
    assert_eq!(emitted, emitted_again);
}

#[test]
fn round_trip_flat_collection_with_nested_variations() {
    let text = "1. e4 e5 (1. Nf3 d5) (1. d4 d5 (1... Nf6) 2. c4) *";
    let first = parse(text, ParseMode::FlatCollection);

    let emitted = serialize(&first, &flat_opts());
    let second = parse(&emitted, ParseMode::FlatCollection);
    assert_nodes_eq(&first.root, &second.root, "root");
}

#[test]
fn flat_collection_has_no_privileged_line() {
    // Two bracket-free runs separated by one parenthesized group: three
    // coequal top-level children.
    let tree = parse("1. e4 e5 (1. d4 d5) 1. c4 c5 *", ParseMode::FlatCollection);
    assert_eq!(tree.root.children.len(), 3);
    for child in &tree.root.children {
        assert_eq!(child.ply, 1);
    }
}

// ---------------------------------------------------------------------------
// Corruption tolerance
// ---------------------------------------------------------------------------

#[test]
fn corrupt_documents_still_round_trip() {
    for text in [
        "1. e4 Qh7 e5 2. Nf3 *",         // illegal move skipped
        "1. e4 e5 (1... c5 2. Nf3",      // unterminated variation
        "1. e4 {never closed",           // unterminated comment
        ") 1. e4 e5 *",                  // stray closing parenthesis
    ] {
        let first = parse(text, ParseMode::Linear);
        assert!(
            !first.root.children.is_empty(),
            "best-effort tree is empty for {text:?}"
        );
        let emitted = serialize(&first, &full_opts());
        let second = parse(&emitted, ParseMode::Linear);
        assert_nodes_eq(&first.root, &second.root, "root");
    }
}
