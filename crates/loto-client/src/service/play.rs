use anyhow::Context as _;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Timelike as _, Utc};
use loto_combora::frequency::{self, FrequencyTable};
use loto_combora::generator::{Generation, GenerationRequest, Generator};
use loto_combora::ledger::{Ledger, LedgerEntry, assign_owners};
use loto_combora::loto::DrawingResult;
use loto_combora::oracle::{self, EntryMarks, MatchReport};

use super::history::{load_history, recent_history};
use super::ledger::{append_ledger, read_ledger};
use crate::db::{DbConnection, DbPool, get_connection};

/// Result of handing out a batch of plays.
#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub generation: Generation,
    pub entries: Vec<LedgerEntry>,
    /// `false` when the entries could not be written and stay pending.
    pub persisted: bool,
}

/// One process worth of work against the store.
///
/// Entries that fail to persist are kept as pending and composed with the
/// stored ledger on every read, so they still block repeats and still show
/// up in match detection.
pub struct Session {
    pool: DbPool,
    pending: Ledger,
    clock: FixedOffset,
}

impl Session {
    pub fn new(pool: DbPool, clock: FixedOffset) -> Self {
        Self {
            pool,
            pending: Ledger::new(),
            clock,
        }
    }

    fn connection(&self) -> anyhow::Result<DbConnection> {
        get_connection(&self.pool)
    }

    pub fn now(&self) -> NaiveDateTime {
        let now = Utc::now().with_timezone(&self.clock).naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn pending(&self) -> &Ledger {
        &self.pending
    }

    /// History snapshot for one pass, oldest first. Empty when unavailable.
    pub fn history(&self) -> Vec<DrawingResult> {
        match self.connection() {
            Ok(mut conn) => load_history(&mut conn),
            Err(e) => {
                log::warn!("History unavailable, continuing without it: {e:#}");
                Vec::new()
            }
        }
    }

    pub fn recent_history(&self, limit: i64) -> anyhow::Result<Vec<DrawingResult>> {
        let mut conn = self.connection()?;
        recent_history(&mut conn, limit)
    }

    /// Stored entries followed by the pending ones. Only the pending ones
    /// when the store cannot be read.
    pub fn ledger(&self) -> Ledger {
        let durable = self
            .connection()
            .and_then(|mut conn| read_ledger(&mut conn));
        match durable {
            Ok(read) => {
                if read.skipped > 0 {
                    log::warn!("{} ledger rows could not be read", read.skipped);
                }
                Ledger::compose(&read.entries, self.pending.entries())
            }
            Err(e) => {
                log::warn!("Ledger unavailable, using pending entries only: {e:#}");
                Ledger::compose(&[], self.pending.entries())
            }
        }
    }

    /// Try to write the pending entries again. Returns whether none remain.
    pub fn flush_pending(&mut self) -> bool {
        if self.pending.is_empty() {
            return true;
        }
        let flushed = self
            .connection()
            .is_ok_and(|mut conn| append_ledger(&mut conn, self.pending.entries()));
        if flushed {
            log::info!("Stored {} pending ledger entries", self.pending.len());
            self.pending = Ledger::new();
        }
        flushed
    }

    /// Generate `owners.len() * per_owner` plays in one batch, split them
    /// among `owners` in order and append them to the ledger.
    pub fn generate_for(
        &mut self,
        owners: &[&str],
        per_owner: usize,
        request: &GenerationRequest,
    ) -> anyhow::Result<PlayOutcome> {
        self.flush_pending();

        let count = owners
            .len()
            .checked_mul(per_owner)
            .with_context(|| format!("{} owners with {per_owner} combinations each is too many", owners.len()))?;
        let history = self.history();
        let ledger = self.ledger();
        let request = GenerationRequest {
            count,
            ..request.clone()
        };

        let generator = Generator::create_generator(Generator::Guillotine);
        let generation = generator.generate(&history, &request, &ledger.primary_sets());
        let entries = assign_owners(generation.combinations(), owners, per_owner, self.now())?;

        let persisted = entries.is_empty()
            || self
                .connection()
                .is_ok_and(|mut conn| append_ledger(&mut conn, &entries));
        if !persisted {
            log::warn!(
                "Keeping {} entries pending until the ledger can be written",
                entries.len()
            );
            self.pending.extend(entries.iter().cloned());
        }

        Ok(PlayOutcome {
            generation,
            entries,
            persisted,
        })
    }

    /// Every match of the ledger against later drawings.
    pub fn detect(&self) -> Vec<MatchReport> {
        let history = self.history();
        oracle::detect_matches(self.ledger().entries(), &history)
    }

    /// Ledger entries newest first, each with its hit marks.
    pub fn vault(&self) -> Vec<(LedgerEntry, EntryMarks)> {
        let history = self.history();
        let entries = self.ledger().into_entries();
        let marks = oracle::mark_entries(&entries, &history);
        let mut vault: Vec<(LedgerEntry, EntryMarks)> = entries.into_iter().zip(marks).collect();
        vault.reverse();
        vault.sort_by(|a, b| b.0.generated_at().cmp(&a.0.generated_at()));
        vault
    }

    pub fn frequency(&self, cutoff: NaiveDate) -> FrequencyTable {
        frequency::analyze_since(&self.history(), cutoff)
    }
}
