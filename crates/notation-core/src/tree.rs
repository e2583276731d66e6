//! The persistent game tree: one node per ply, ordered children with the
//! main line at index 0, mutated through a path-addressed command API.

use move_quality::Score;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::annotation::Annotation;
use crate::error::{ParseError, TreeError};
use crate::headers::GameHeaders;
use crate::markup::DrawShape;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A sequence of zero-based child indices addressing a node from the root.
///
/// Paths are recomputed, never stored: any structural edit upstream of a
/// path invalidates it, and the caller re-derives it.
pub type Path = Vec<usize>;

/// One ply of a game. The root node carries the starting position and no
/// move.
#[derive(Debug, Clone)]
pub struct GameNode {
    /// Board state after this node's move, as a FEN string.
    pub fen: String,
    /// The applied move; `None` on the root.
    pub mv: Option<Move>,
    /// Canonical human-readable move text; `None` on the root.
    pub san: Option<String>,
    /// Half-moves from the game start to this node.
    pub ply: u32,
    /// Ordered children. `children[0]` is the main-line continuation,
    /// `children[1..]` are side variations.
    pub children: Vec<GameNode>,
    /// At most one basic quality marker, plus any number of glyphs, kept
    /// priority-sorted.
    pub annotations: Vec<Annotation>,
    pub comment: Option<String>,
    pub eval: Option<Score>,
    /// Remaining time in seconds for the side that just moved.
    pub clock: Option<f64>,
    pub shapes: Vec<DrawShape>,
}

impl GameNode {
    /// A detached node with no children or annotations.
    pub fn new(fen: impl Into<String>, mv: Option<Move>, san: Option<String>, ply: u32) -> Self {
        GameNode {
            fen: fen.into(),
            mv,
            san,
            ply,
            children: Vec::new(),
            annotations: Vec::new(),
            comment: None,
            eval: None,
            clock: None,
            shapes: Vec::new(),
        }
    }

    /// Attach an annotation. A basic quality marker replaces any existing
    /// one (later wins); duplicates are dropped; the set stays sorted.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        if annotation.is_basic() {
            self.annotations.retain(|a| !a.is_basic());
        }
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
        self.annotations.sort_by_key(|a| a.order_key());
    }

    /// The node's basic quality marker, if any.
    pub fn quality(&self) -> Option<move_quality::MoveQuality> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Quality(q) => Some(*q),
            Annotation::Glyph(_) => None,
        })
    }

    /// Main-line descent from (and excluding) this node.
    pub fn main_line(&self) -> impl Iterator<Item = &GameNode> {
        std::iter::successors(self.children.first(), |n| n.children.first())
    }
}

/// A rooted game tree plus the document-level headers.
#[derive(Debug, Clone)]
pub struct GameTree {
    pub headers: GameHeaders,
    pub root: GameNode,
}

impl GameTree {
    /// Tree rooted at the standard starting position.
    pub fn starting() -> Self {
        GameTree {
            headers: GameHeaders::default(),
            root: GameNode::new(STANDARD_START_FEN, None, None, 0),
        }
    }

    /// Tree rooted at an arbitrary position. The root ply is derived from
    /// the FEN's move counters so numbering stays correct mid-game.
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        let pos = position_from_fen(fen)?;
        let mut tree = GameTree {
            headers: GameHeaders::default(),
            root: GameNode::new(fen_of(&pos), None, None, ply_of(&pos)),
        };
        if tree.root.fen != STANDARD_START_FEN {
            tree.headers.fen = Some(tree.root.fen.clone());
        }
        Ok(tree)
    }

    pub fn find_node(&self, path: &[usize]) -> Result<&GameNode, TreeError> {
        let mut node = &self.root;
        for (depth, &index) in path.iter().enumerate() {
            node = node
                .children
                .get(index)
                .ok_or(TreeError::InvalidPath { depth })?;
        }
        Ok(node)
    }

    pub fn find_node_mut(&mut self, path: &[usize]) -> Result<&mut GameNode, TreeError> {
        let mut node = &mut self.root;
        for (depth, &index) in path.iter().enumerate() {
            node = node
                .children
                .get_mut(index)
                .ok_or(TreeError::InvalidPath { depth })?;
        }
        Ok(node)
    }

    /// Append a child to the node at `parent`. When the parent had no
    /// children, the new node becomes the main line. Returns the child's
    /// index.
    pub fn append_child(&mut self, parent: &[usize], node: GameNode) -> Result<usize, TreeError> {
        let parent = self.find_node_mut(parent)?;
        parent.children.push(node);
        Ok(parent.children.len() - 1)
    }

    /// Insert a non-main-line child at `at` (default: end). Index 0 of a
    /// non-empty child list is the main line and cannot be taken this way.
    pub fn insert_variation(
        &mut self,
        parent: &[usize],
        node: GameNode,
        at: Option<usize>,
    ) -> Result<usize, TreeError> {
        let parent = self.find_node_mut(parent)?;
        let len = parent.children.len();
        let index = at.unwrap_or(len);
        if index > len || (index == 0 && len > 0) {
            return Err(TreeError::OutOfRange { index, len });
        }
        parent.children.insert(index, node);
        Ok(index)
    }

    /// Detach and return the subtree rooted at `parent`'s child `index`.
    /// Removing `children[0]` promotes `children[1]` to the main line.
    pub fn remove_node(&mut self, parent: &[usize], index: usize) -> Result<GameNode, TreeError> {
        let parent = self.find_node_mut(parent)?;
        let len = parent.children.len();
        if index >= len {
            return Err(TreeError::OutOfRange { index, len });
        }
        Ok(parent.children.remove(index))
    }
}

pub(crate) fn position_from_fen(fen: &str) -> Result<Chess, ParseError> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| ParseError::InvalidFen(format!("{fen}: {e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| ParseError::InvalidFen(format!("{fen}: {e}")))
}

pub(crate) fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Half-moves played since the start of the game this position belongs to.
pub(crate) fn ply_of(pos: &Chess) -> u32 {
    (pos.fullmoves().get() - 1) * 2 + u32::from(pos.turn() == Color::Black)
}
