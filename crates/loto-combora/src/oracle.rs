//! Retroactive match detection of ledger entries against drawings.

use chrono::{NaiveDate, NaiveDateTime};
use console::style;
use serde::Serialize;
use std::fmt::Display;

use crate::ledger::LedgerEntry;
use crate::loto::{DrawingResult, MatchLevel, NumberSet};

/// A ledger entry that shared three or more primaries with a later drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub drawing_date: NaiveDate,
    pub owner: String,
    pub generated_at: NaiveDateTime,
    pub hit_count: u8,
    pub hit_numbers: Vec<u8>,
    pub level: MatchLevel,
}

impl MatchReport {
    pub fn is_full(&self) -> bool {
        self.level.is_full()
    }
}

impl Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hits = self
            .hit_numbers
            .iter()
            .map(|n| format!("{n:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let level = if self.is_full() {
            style(self.level.description()).red().bold()
        } else {
            style(self.level.description()).yellow()
        };
        write!(
            f,
            "{} {} [{}] {}",
            style(self.drawing_date.format("%Y-%m-%d")).green().bold(),
            style(&self.owner).cyan(),
            hits,
            level
        )
    }
}

/// History sorted by date, so each entry finds its first eligible drawing by
/// binary search.
struct Timeline<'a> {
    drawings: Vec<&'a DrawingResult>,
}

impl<'a> Timeline<'a> {
    fn new(history: &'a [DrawingResult]) -> Self {
        let mut drawings: Vec<&DrawingResult> = history.iter().collect();
        drawings.sort_by_key(|d| d.date());
        Self { drawings }
    }

    /// Drawings dated on or after `day`.
    fn since(&self, day: NaiveDate) -> &[&'a DrawingResult] {
        let start = self.drawings.partition_point(|d| d.date() < day);
        &self.drawings[start..]
    }
}

/// Every (entry, drawing) pair with three or more shared primaries, where the
/// drawing is dated on or after the day the entry was generated.
///
/// Reports are ordered by drawing date, then owner, then descending hits.
pub fn detect_matches(ledger: &[LedgerEntry], history: &[DrawingResult]) -> Vec<MatchReport> {
    let timeline = Timeline::new(history);
    let mut reports = Vec::new();

    for entry in ledger {
        let combination = entry.combination();
        for drawing in timeline.since(entry.generated_on()) {
            let Some(level) = combination.match_level(drawing) else {
                continue;
            };
            let hits = combination.hits_against(drawing);
            reports.push(MatchReport {
                drawing_date: drawing.date(),
                owner: entry.owner().to_owned(),
                generated_at: entry.generated_at(),
                hit_count: level.hit_count(),
                hit_numbers: hits.to_vec(),
                level,
            });
        }
    }

    reports.sort_by(|a, b| {
        a.drawing_date
            .cmp(&b.drawing_date)
            .then_with(|| a.owner.cmp(&b.owner))
            .then_with(|| b.hit_count.cmp(&a.hit_count))
    });
    log::debug!(
        "Oracle checked {} entries against {} drawings, {} matches",
        ledger.len(),
        history.len(),
        reports.len()
    );
    reports
}

/// What the vault highlights for one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryMarks {
    /// Primaries of the entry drawn on or after its generation day.
    pub hits: NumberSet,
    /// Some eligible drawing matched all six primaries.
    pub burned: bool,
}

pub fn mark_entry(entry: &LedgerEntry, history: &[DrawingResult]) -> EntryMarks {
    mark_with(entry, &Timeline::new(history))
}

/// Marks for every entry, in ledger order, sorting the history only once.
pub fn mark_entries(ledger: &[LedgerEntry], history: &[DrawingResult]) -> Vec<EntryMarks> {
    let timeline = Timeline::new(history);
    ledger
        .iter()
        .map(|entry| mark_with(entry, &timeline))
        .collect()
}

fn mark_with(entry: &LedgerEntry, timeline: &Timeline<'_>) -> EntryMarks {
    let combination = entry.combination();
    timeline
        .since(entry.generated_on())
        .iter()
        .fold(EntryMarks::default(), |marks, drawing| {
            let hits = combination.hits_against(drawing);
            EntryMarks {
                hits: marks.hits.union(&hits),
                burned: marks.burned || MatchLevel::from_hits(hits.len()).is_some_and(|l| l.is_full()),
            }
        })
}
