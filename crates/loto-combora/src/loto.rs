mod bits;
mod check;
mod def;

pub use bits::NumberSet;
pub use check::MatchLevel;
pub use def::{
    BONUS1_MAX, BONUS2_MAX, Combination, DrawingResult, LotoError, PRIMARY_COUNT, PRIMARY_MAX,
};
