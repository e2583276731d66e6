//! Path-addressed read/write cursor over a game tree.
//!
//! The cursor is the single coordinating owner of the tree while it lives:
//! it borrows the tree mutably and keeps its path valid across its own
//! edits, so callers never hold stale node references.

use shakmaty::san::SanPlus;
use shakmaty::Chess;

use crate::error::TreeError;
use crate::tree::{fen_of, position_from_fen, GameNode, GameTree};

pub struct TreeCursor<'a> {
    tree: &'a mut GameTree,
    path: Vec<usize>,
}

impl<'a> TreeCursor<'a> {
    /// Cursor positioned at the root.
    pub fn new(tree: &'a mut GameTree) -> Self {
        TreeCursor {
            tree,
            path: Vec::new(),
        }
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn node(&self) -> &GameNode {
        let mut node = &self.tree.root;
        for &index in &self.path {
            node = &node.children[index];
        }
        node
    }

    fn node_mut(&mut self) -> &mut GameNode {
        let mut node = &mut self.tree.root;
        for &index in &self.path {
            node = &mut node.children[index];
        }
        node
    }

    /// Re-hydrated position at the cursor.
    pub fn position(&self) -> Result<Chess, TreeError> {
        position_from_fen(&self.node().fen)
            .map_err(|e| TreeError::CorruptPosition(e.to_string()))
    }

    /// Step into the main-line continuation. Returns false at a leaf.
    pub fn next(&mut self) -> bool {
        if self.node().children.is_empty() {
            false
        } else {
            self.path.push(0);
            true
        }
    }

    /// Step back to the parent. Returns false at the root.
    pub fn prev(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Step into the child at `index` (0 is the main line).
    pub fn enter_variation(&mut self, index: usize) -> Result<(), TreeError> {
        let len = self.node().children.len();
        if index >= len {
            return Err(TreeError::OutOfRange { index, len });
        }
        self.path.push(index);
        Ok(())
    }

    pub fn to_start(&mut self) {
        self.path.clear();
    }

    /// Follow the main line to its end.
    pub fn to_end(&mut self) {
        while self.next() {}
    }

    /// Jump to an arbitrary path, validating it first.
    pub fn goto(&mut self, path: &[usize]) -> Result<(), TreeError> {
        self.tree.find_node(path)?;
        self.path = path.to_vec();
        Ok(())
    }

    /// Play a move from the cursor position and advance onto it.
    ///
    /// Follows an existing child carrying the same move instead of
    /// duplicating it; otherwise appends a new node, which becomes the
    /// main line when it is the first child and a variation otherwise.
    pub fn play_san(&mut self, san: &str) -> Result<&GameNode, TreeError> {
        let pos = self.position()?;
        let parsed: SanPlus = san
            .parse()
            .map_err(|_| TreeError::UnresolvedMove(san.to_string()))?;
        let mv = parsed
            .san
            .to_move(&pos)
            .map_err(|_| TreeError::UnresolvedMove(san.to_string()))?;
        let mut next = pos;
        let canonical = SanPlus::from_move_and_play_unchecked(&mut next, mv).to_string();

        let existing = self
            .node()
            .children
            .iter()
            .position(|c| c.san.as_deref() == Some(canonical.as_str()));
        match existing {
            Some(index) => self.path.push(index),
            None => {
                let ply = self.node().ply + 1;
                let child = GameNode::new(fen_of(&next), Some(mv), Some(canonical), ply);
                let node = self.node_mut();
                node.children.push(child);
                let index = node.children.len() - 1;
                self.path.push(index);
            }
        }
        Ok(self.node())
    }

    /// Remove the subtree at the cursor and step back to its parent. The
    /// root cannot be deleted.
    pub fn delete_here(&mut self) -> Result<GameNode, TreeError> {
        match self.path.pop() {
            Some(index) => self.tree.remove_node(&self.path, index),
            None => Err(TreeError::InvalidPath { depth: 0 }),
        }
    }

    /// Make the node at the cursor the main-line child of its parent.
    pub fn promote_variation(&mut self) -> Result<(), TreeError> {
        let Some(&index) = self.path.last() else {
            return Err(TreeError::InvalidPath { depth: 0 });
        };
        if index == 0 {
            return Ok(());
        }
        let depth = self.path.len() - 1;
        let parent_path = self.path[..depth].to_vec();
        let parent = self.tree.find_node_mut(&parent_path)?;
        let node = parent.children.remove(index);
        parent.children.insert(0, node);
        self.path[depth] = 0;
        Ok(())
    }
}
