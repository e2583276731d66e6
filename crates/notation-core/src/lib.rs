//! Game-notation core: the branching game tree, the bidirectional
//! transform between trees and portable notation text, and the
//! path-addressed cursor the study layer drives the tree through.

pub mod annotation;
pub mod cursor;
pub mod error;
pub mod headers;
pub mod markup;
pub mod parser;
pub mod serializer;
pub mod token;
pub mod tree;

pub use annotation::{Annotation, MoveQuality};
pub use cursor::TreeCursor;
pub use error::{ParseError, TreeError};
pub use headers::GameHeaders;
pub use markup::{CommentParts, DrawShape, ShapeColor};
pub use parser::{parse_text, parse_tokens, ParseMode};
pub use serializer::{serialize, SerializeOptions};
pub use token::{tokenize, Token};
pub use tree::{GameNode, GameTree, Path, STANDARD_START_FEN};
