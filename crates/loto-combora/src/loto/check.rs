use serde::Serialize;

use super::{Combination, DrawingResult, NumberSet};

/// How many primaries a play shared with a drawing, from three up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchLevel {
    Three,
    Four,
    Five,
    /// All six primaries.
    Full,
}

impl MatchLevel {
    /// `None` for two hits or fewer.
    pub fn from_hits(hits: usize) -> Option<Self> {
        match hits {
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            6 => Some(Self::Full),
            _ => None,
        }
    }

    pub fn hit_count(&self) -> u8 {
        match self {
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Full => 6,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Three => "3 hits",
            Self::Four => "4 hits",
            Self::Five => "5 hits",
            Self::Full => "FULL MATCH",
        }
    }
}

impl Combination {
    /// Primaries of this play that were drawn in `drawing`. Bonuses never count.
    pub fn hits_against(&self, drawing: &DrawingResult) -> NumberSet {
        self.number_set().intersection(&drawing.number_set())
    }

    pub fn match_level(&self, drawing: &DrawingResult) -> Option<MatchLevel> {
        MatchLevel::from_hits(self.number_set().shared(&drawing.number_set()))
    }
}
