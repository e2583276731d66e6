//! Move annotations: the basic quality markers plus positional glyphs,
//! addressed by their numeric (NAG) codes.

use serde::{Deserialize, Serialize};

pub use move_quality::MoveQuality;

/// One annotation attached to a node. At most one `Quality` marker may live
/// on a node at a time; `Glyph` carries any non-basic numeric code
/// unchanged so unknown codes survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Annotation {
    Quality(MoveQuality),
    Glyph(u16),
}

impl Annotation {
    pub fn from_nag(code: u16) -> Self {
        match MoveQuality::from_nag(code) {
            Some(q) => Annotation::Quality(q),
            None => Annotation::Glyph(code),
        }
    }

    pub fn nag(self) -> u16 {
        match self {
            Annotation::Quality(q) => q.nag(),
            Annotation::Glyph(code) => code,
        }
    }

    pub fn is_basic(self) -> bool {
        matches!(self, Annotation::Quality(_))
    }

    /// Sort key: the basic marker first, then glyphs by ascending code.
    pub(crate) fn order_key(self) -> (u8, u16) {
        (u8::from(!self.is_basic()), self.nag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_codes_map_to_quality() {
        assert_eq!(
            Annotation::from_nag(4),
            Annotation::Quality(MoveQuality::Blunder)
        );
        assert_eq!(
            Annotation::from_nag(7),
            Annotation::Quality(MoveQuality::Best)
        );
        assert_eq!(Annotation::from_nag(13), Annotation::Glyph(13));
    }

    #[test]
    fn test_nag_survives_round_trip() {
        for code in [1u16, 4, 7, 10, 13, 18, 145] {
            assert_eq!(Annotation::from_nag(code).nag(), code);
        }
    }
}
