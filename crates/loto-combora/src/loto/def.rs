use chrono::NaiveDate;
use console::style;
use serde::Serialize;
use std::fmt::Display;

use super::NumberSet;

pub const PRIMARY_COUNT: usize = 6;
pub const PRIMARY_MAX: u8 = 40;
/// Loto Más bonus ball range is `1..=BONUS1_MAX`.
pub const BONUS1_MAX: u8 = 12;
/// Super Más bonus ball range is `1..=BONUS2_MAX`.
pub const BONUS2_MAX: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LotoError {
    #[error("Invalid number of primary numbers: expected 6, got {0}")]
    InvalidPrimaryCount(usize),
    #[error("Primary number {0} is out of range (1-40)")]
    PrimaryOutOfRange(u8),
    #[error("Duplicate primary numbers found")]
    PrimaryDuplicate,
    #[error("Loto Más bonus {0} is out of range (1-12)")]
    Bonus1OutOfRange(u8),
    #[error("Super Más bonus {0} is out of range (1-15)")]
    Bonus2OutOfRange(u8),
    #[error("Owner label cannot be empty")]
    EmptyOwner,
}

/// Validate six primaries, returning them in their original order.
fn check_primaries(primaries: &[u8]) -> Result<[u8; PRIMARY_COUNT], LotoError> {
    let primaries: [u8; PRIMARY_COUNT] = primaries
        .try_into()
        .map_err(|_e| LotoError::InvalidPrimaryCount(primaries.len()))?;

    if let Some(&ball) = primaries.iter().find(|&&n| n < 1 || n > PRIMARY_MAX) {
        return Err(LotoError::PrimaryOutOfRange(ball));
    }

    if NumberSet::from_numbers(&primaries).len() != PRIMARY_COUNT {
        return Err(LotoError::PrimaryDuplicate);
    }

    Ok(primaries)
}

fn check_bonuses(bonus1: u8, bonus2: u8) -> Result<(), LotoError> {
    if !(1..=BONUS1_MAX).contains(&bonus1) {
        return Err(LotoError::Bonus1OutOfRange(bonus1));
    }
    if !(1..=BONUS2_MAX).contains(&bonus2) {
        return Err(LotoError::Bonus2OutOfRange(bonus2));
    }
    Ok(())
}

fn paint_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One official drawing. Identity is the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DrawingResult {
    date: NaiveDate,
    primaries: [u8; PRIMARY_COUNT],
    bonus1: u8,
    bonus2: u8,
}

impl DrawingResult {
    /// Primaries keep the order they were drawn in.
    pub fn new(
        date: NaiveDate,
        primaries: &[u8],
        bonus1: u8,
        bonus2: u8,
    ) -> Result<Self, LotoError> {
        let primaries = check_primaries(primaries)?;
        check_bonuses(bonus1, bonus2)?;
        Ok(Self {
            date,
            primaries,
            bonus1,
            bonus2,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn primaries(&self) -> &[u8; PRIMARY_COUNT] {
        &self.primaries
    }

    pub fn bonus1(&self) -> u8 {
        self.bonus1
    }

    pub fn bonus2(&self) -> u8 {
        self.bonus2
    }

    pub fn number_set(&self) -> NumberSet {
        NumberSet::from_numbers(&self.primaries)
    }
}

impl Display for DrawingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            style(self.date.format("%Y-%m-%d")).green().bold(),
            style(paint_numbers(&self.primaries)).red().bold(),
            style(format!("{:02}", self.bonus1)).blue().bold(),
            style(format!("{:02}", self.bonus2)).blue().bold(),
        )
    }
}

/// A generated play: six sorted primaries plus the two unfiltered bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Combination {
    primaries: [u8; PRIMARY_COUNT],
    bonus1: u8,
    bonus2: u8,
    sum: u16,
}

impl Combination {
    pub fn new(primaries: &[u8], bonus1: u8, bonus2: u8) -> Result<Self, LotoError> {
        let primaries = check_primaries(primaries)?;
        check_bonuses(bonus1, bonus2)?;
        Ok(Self::from_sorted(primaries, bonus1, bonus2))
    }

    /// Caller guarantees six distinct in-range primaries and in-range bonuses.
    pub(crate) fn from_sorted(mut primaries: [u8; PRIMARY_COUNT], bonus1: u8, bonus2: u8) -> Self {
        primaries.sort_unstable();
        let sum = primaries.iter().map(|&n| u16::from(n)).sum();
        Self {
            primaries,
            bonus1,
            bonus2,
            sum,
        }
    }

    pub fn primaries(&self) -> &[u8; PRIMARY_COUNT] {
        &self.primaries
    }

    pub fn bonus1(&self) -> u8 {
        self.bonus1
    }

    pub fn bonus2(&self) -> u8 {
        self.bonus2
    }

    pub fn sum(&self) -> u16 {
        self.sum
    }

    pub fn number_set(&self) -> NumberSet {
        NumberSet::from_numbers(&self.primaries)
    }

    pub fn format_numbers(&self) -> String {
        format!(
            "{} + {:02} + {:02}",
            paint_numbers(&self.primaries),
            self.bonus1,
            self.bonus2
        )
    }
}

impl Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} (sum {})",
            style(paint_numbers(&self.primaries)).red().bold(),
            style(format!("{:02}", self.bonus1)).blue().bold(),
            style(format!("{:02}", self.bonus2)).blue().bold(),
            self.sum
        )
    }
}
