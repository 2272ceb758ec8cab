use chrono::NaiveDate;
use serde::Serialize;

use crate::loto::{DrawingResult, PRIMARY_MAX};

/// First drawing with the 40-ball machine. Earlier drawings used 38 balls and
/// are left out of frequency analysis.
pub const MODERN_ERA_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2024, 3, 1) {
    Some(date) => date,
    None => panic!("invalid modern era cutoff"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub appearances: u32,
}

/// Appearance count of every primary number over the analysis window.
///
/// Either empty (no drawings in the window) or holding exactly one row per
/// number `1..=40`, ordered by number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    rows: Vec<NumberFrequency>,
    draws: usize,
}

impl FrequencyTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows ordered by number, for display.
    pub fn by_number(&self) -> &[NumberFrequency] {
        &self.rows
    }

    /// Rows ordered by descending count; ties go to the lower number.
    pub fn ranked(&self) -> Vec<NumberFrequency> {
        let mut ranked = self.rows.clone();
        ranked.sort_by(|a, b| {
            b.appearances
                .cmp(&a.appearances)
                .then(a.number.cmp(&b.number))
        });
        ranked
    }

    pub fn count(&self, number: u8) -> Option<u32> {
        self.rows
            .iter()
            .find(|row| row.number == number)
            .map(|row| row.appearances)
    }

    /// Number of drawings inside the window.
    pub fn total_draws(&self) -> usize {
        self.draws
    }

    pub fn max_appearances(&self) -> u32 {
        self.rows.iter().map(|row| row.appearances).max().unwrap_or(0)
    }
}

/// Frequency over the modern era.
pub fn analyze(history: &[DrawingResult]) -> FrequencyTable {
    analyze_since(history, MODERN_ERA_CUTOFF)
}

/// Frequency over drawings dated on or after `cutoff`.
pub fn analyze_since(history: &[DrawingResult], cutoff: NaiveDate) -> FrequencyTable {
    let mut counts = [0u32; PRIMARY_MAX as usize + 1];
    let mut draws = 0;

    for drawing in history.iter().filter(|d| d.date() >= cutoff) {
        draws += 1;
        for &n in drawing.primaries() {
            counts[usize::from(n)] += 1;
        }
    }

    if draws == 0 {
        log::debug!(
            "No drawings on or after {cutoff} among {} stored, frequency table is empty",
            history.len()
        );
        return FrequencyTable::default();
    }

    let rows = (1..=PRIMARY_MAX)
        .map(|number| NumberFrequency {
            number,
            appearances: counts[usize::from(number)],
        })
        .collect();

    log::debug!("Frequency table built from {draws} drawings since {cutoff}");
    FrequencyTable { rows, draws }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing(y: i32, m: u32, d: u32, primaries: [u8; 6]) -> DrawingResult {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DrawingResult::new(date, &primaries, 1, 1).unwrap()
    }

    #[test]
    fn empty_history_gives_empty_table() {
        let table = analyze(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total_draws(), 0);
        assert!(table.ranked().is_empty());
    }

    #[test]
    fn only_pre_cutoff_drawings_gives_empty_table() {
        let history = [drawing(2023, 12, 30, [1, 2, 3, 4, 5, 6])];
        assert!(analyze(&history).is_empty());
    }

    #[test]
    fn counts_are_zero_filled_and_ordered_by_number() {
        let history = [
            drawing(2024, 2, 28, [7, 8, 9, 10, 11, 12]),
            drawing(2024, 3, 1, [1, 2, 3, 4, 5, 40]),
            drawing(2024, 3, 4, [40, 2, 13, 14, 15, 16]),
        ];
        let table = analyze(&history);

        assert_eq!(table.total_draws(), 2);
        assert_eq!(table.by_number().len(), 40);
        assert!(
            table
                .by_number()
                .windows(2)
                .all(|w| w[0].number + 1 == w[1].number)
        );
        assert_eq!(table.count(40), Some(2));
        assert_eq!(table.count(2), Some(2));
        assert_eq!(table.count(1), Some(1));
        // drawn only before the cutoff
        assert_eq!(table.count(7), Some(0));
        assert_eq!(table.count(41), None);
        assert_eq!(table.max_appearances(), 2);
    }

    #[test]
    fn ranking_breaks_ties_by_number() {
        let history = [
            drawing(2024, 3, 1, [1, 2, 3, 4, 5, 40]),
            drawing(2024, 3, 4, [40, 2, 13, 14, 15, 16]),
        ];
        let ranked = analyze(&history).ranked();

        let top: Vec<u8> = ranked.iter().take(3).map(|r| r.number).collect();
        assert_eq!(top, vec![2, 40, 1]);
        assert_eq!(ranked.len(), 40);
        assert_eq!(ranked.last().map(|r| r.number), Some(39));
    }

    #[test]
    fn custom_cutoff() {
        let history = [drawing(2023, 6, 1, [1, 2, 3, 4, 5, 6])];
        let cutoff = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let table = analyze_since(&history, cutoff);
        assert_eq!(table.total_draws(), 1);
        assert_eq!(table.count(6), Some(1));
    }
}
