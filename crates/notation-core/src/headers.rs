//! Game metadata owned by the document, not by any node.

use serde::{Deserialize, Serialize};

/// Header fields read by the serializer and written once at parse time.
///
/// `fen` is the declared starting-position override; `start` holds the ply
/// indices of pre-game setup moves and never round-trips through notation
/// text. `orientation` is the preferred board orientation for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHeaders {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub round: Option<String>,
    pub white: Option<String>,
    pub white_elo: Option<u32>,
    pub black: Option<String>,
    pub black_elo: Option<u32>,
    pub result: Option<String>,
    pub time_control: Option<String>,
    pub variant: Option<String>,
    pub orientation: Option<String>,
    pub fen: Option<String>,
    #[serde(default)]
    pub start: Vec<u32>,
}

impl GameHeaders {
    /// Absorb one header tag pair. Unknown tags are ignored.
    pub fn set_tag(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "Event" => self.event = Some(value),
            "Site" => self.site = Some(value),
            "Date" => self.date = Some(value),
            "Round" => self.round = Some(value),
            "White" => self.white = Some(value),
            "WhiteElo" => self.white_elo = value.parse().ok(),
            "Black" => self.black = Some(value),
            "BlackElo" => self.black_elo = value.parse().ok(),
            "Result" => self.result = Some(value),
            "TimeControl" => self.time_control = Some(value),
            "Variant" => self.variant = Some(value),
            "Orientation" => self.orientation = Some(value),
            "FEN" => self.fen = Some(value),
            _ => {}
        }
    }

    /// Tag pairs in the fixed emission order, skipping absent fields.
    /// `SetUp`/`FEN` are handled by the serializer from the root position.
    pub fn tag_pairs(&self) -> Vec<(&'static str, String)> {
        let fields: [(&'static str, Option<String>); 12] = [
            ("Event", self.event.clone()),
            ("Site", self.site.clone()),
            ("Date", self.date.clone()),
            ("Round", self.round.clone()),
            ("White", self.white.clone()),
            ("Black", self.black.clone()),
            ("WhiteElo", self.white_elo.map(|e| e.to_string())),
            ("BlackElo", self.black_elo.map(|e| e.to_string())),
            ("Result", self.result.clone()),
            ("TimeControl", self.time_control.clone()),
            ("Variant", self.variant.clone()),
            ("Orientation", self.orientation.clone()),
        ];
        fields
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_tag_known_and_unknown() {
        let mut h = GameHeaders::default();
        h.set_tag("White", "Carlsen, M.");
        h.set_tag("WhiteElo", "2863");
        h.set_tag("WhiteElo2", "9999");
        h.set_tag("UnknownTag", "x");
        assert_eq!(h.white.as_deref(), Some("Carlsen, M."));
        assert_eq!(h.white_elo, Some(2863));
        assert_eq!(h.black, None);
    }

    #[test]
    fn test_tag_pairs_order_and_skipping() {
        let mut h = GameHeaders::default();
        h.set_tag("Result", "1-0");
        h.set_tag("Event", "Casual game");
        let pairs = h.tag_pairs();
        assert_eq!(pairs[0].0, "Event");
        assert_eq!(pairs[1].0, "Result");
        assert_eq!(pairs.len(), 2);
    }
}
