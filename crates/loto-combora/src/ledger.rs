//! Append-only record of every combination handed to a player.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;

use crate::loto::{Combination, LotoError, NumberSet};

/// One committed play: who got it, when, and the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LedgerEntry {
    generated_at: NaiveDateTime,
    owner: String,
    combination: Combination,
}

impl LedgerEntry {
    /// The owner label is trimmed and must not be blank.
    pub fn new(
        generated_at: NaiveDateTime,
        owner: &str,
        combination: Combination,
    ) -> Result<Self, LotoError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(LotoError::EmptyOwner);
        }
        Ok(Self {
            generated_at,
            owner: owner.to_owned(),
            combination,
        })
    }

    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    /// Calendar day of generation; drawings on this day already count.
    pub fn generated_on(&self) -> NaiveDate {
        self.generated_at.date()
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Snapshot of the persisted entries followed by the ones recorded in this
    /// process but not yet persisted. An entry present in both is kept once.
    pub fn compose(durable: &[LedgerEntry], pending: &[LedgerEntry]) -> Self {
        let mut present: HashSet<&LedgerEntry> = HashSet::with_capacity(durable.len());
        let mut entries = Vec::with_capacity(durable.len() + pending.len());
        for entry in durable.iter().chain(pending) {
            if present.insert(entry) {
                entries.push(entry.clone());
            }
        }
        Self { entries }
    }

    pub fn append(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = LedgerEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Primary sets already handed out, in insertion order.
    pub fn primary_sets(&self) -> Vec<NumberSet> {
        self.entries
            .iter()
            .map(|entry| entry.combination.number_set())
            .collect()
    }
}

/// Split one generated batch among `owners` in order: owner `i` gets
/// combinations `i * per_owner .. (i + 1) * per_owner`. A short batch leaves
/// the trailing owners with fewer entries, possibly none.
pub fn assign_owners(
    combinations: &[Combination],
    owners: &[&str],
    per_owner: usize,
    generated_at: NaiveDateTime,
) -> Result<Vec<LedgerEntry>, LotoError> {
    if per_owner == 0 {
        return Ok(Vec::new());
    }
    owners
        .iter()
        .zip(combinations.chunks(per_owner))
        .flat_map(|(owner, chunk)| {
            chunk
                .iter()
                .map(move |combination| LedgerEntry::new(generated_at, owner, *combination))
        })
        .collect()
}
