use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use loto_combora::ledger::LedgerEntry;
use loto_combora::loto::{Combination, LotoError};

/// Text layout of `ledger.generated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stored ledger row. Number columns are nullable because the table may have
/// been edited by hand.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::ledger)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerRow {
    pub id: i32,
    pub generated_at: String,
    pub owner: String,
    pub ball1: Option<i32>,
    pub ball2: Option<i32>,
    pub ball3: Option<i32>,
    pub ball4: Option<i32>,
    pub ball5: Option<i32>,
    pub ball6: Option<i32>,
    pub bonus1: Option<i32>,
    pub bonus2: Option<i32>,
    pub total: Option<i32>,
}

#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::ledger)]
pub struct NewLedgerRow {
    pub generated_at: String,
    pub owner: String,
    pub ball1: Option<i32>,
    pub ball2: Option<i32>,
    pub ball3: Option<i32>,
    pub ball4: Option<i32>,
    pub ball5: Option<i32>,
    pub ball6: Option<i32>,
    pub bonus1: Option<i32>,
    pub bonus2: Option<i32>,
    pub total: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerRowError {
    #[error("Unreadable generation time '{0}'")]
    InvalidTimestamp(String),
    #[error("Missing primary numbers")]
    MissingPrimaries,
    #[error("Missing bonus numbers")]
    MissingBonus,
    #[error("Stored number {0} does not fit a ball")]
    NumberOutOfRange(i32),
    #[error(transparent)]
    Invalid(#[from] LotoError),
}

/// Full timestamps, or a bare date taken as midnight.
pub fn parse_generated_at(text: &str) -> Result<NaiveDateTime, LedgerRowError> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| LedgerRowError::InvalidTimestamp(text.to_owned()))
}

fn to_ball(value: Option<i32>, missing: LedgerRowError) -> Result<u8, LedgerRowError> {
    let value = value.ok_or(missing)?;
    u8::try_from(value).map_err(|_e| LedgerRowError::NumberOutOfRange(value))
}

impl NewLedgerRow {
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        let combination = entry.combination();
        let [ball1, ball2, ball3, ball4, ball5, ball6] =
            combination.primaries().map(|n| Some(i32::from(n)));
        Self {
            generated_at: entry.generated_at().format(TIMESTAMP_FORMAT).to_string(),
            owner: entry.owner().to_owned(),
            ball1,
            ball2,
            ball3,
            ball4,
            ball5,
            ball6,
            bonus1: Some(i32::from(combination.bonus1())),
            bonus2: Some(i32::from(combination.bonus2())),
            total: Some(i32::from(combination.sum())),
        }
    }
}

impl LedgerRow {
    /// Rebuild the entry. A missing total is recomputed; a total that
    /// disagrees with the numbers is logged and recomputed.
    pub fn to_entry(&self) -> Result<LedgerEntry, LedgerRowError> {
        let generated_at = parse_generated_at(&self.generated_at)?;

        let balls = [
            self.ball1, self.ball2, self.ball3, self.ball4, self.ball5, self.ball6,
        ]
        .into_iter()
        .map(|ball| to_ball(ball, LedgerRowError::MissingPrimaries))
        .collect::<Result<Vec<u8>, _>>()?;
        let bonus1 = to_ball(self.bonus1, LedgerRowError::MissingBonus)?;
        let bonus2 = to_ball(self.bonus2, LedgerRowError::MissingBonus)?;

        let combination = Combination::new(&balls, bonus1, bonus2)?;
        if let Some(total) = self.total {
            if total != i32::from(combination.sum()) {
                log::warn!(
                    "Ledger row {} stores total {total} but its numbers add up to {}",
                    self.id,
                    combination.sum()
                );
            }
        }

        Ok(LedgerEntry::new(generated_at, &self.owner, combination)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(generated_at: &str) -> LedgerRow {
        LedgerRow {
            id: 1,
            generated_at: generated_at.to_owned(),
            owner: "Ana".to_owned(),
            ball1: Some(40),
            ball2: Some(3),
            ball3: Some(17),
            ball4: Some(9),
            ball5: Some(22),
            ball6: Some(31),
            bonus1: Some(4),
            bonus2: Some(15),
            total: Some(122),
        }
    }

    #[test]
    fn entry_round_trips_through_row() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(19, 45, 12)
            .unwrap();
        let combination = Combination::new(&[40, 3, 17, 9, 22, 31], 4, 15).unwrap();
        let entry = LedgerEntry::new(at, "Ana", combination).unwrap();

        let row = NewLedgerRow::from_entry(&entry);
        assert_eq!(row.generated_at, "2024-03-05 19:45:12");
        assert_eq!(row.ball1, Some(3));
        assert_eq!(row.total, Some(122));

        assert_eq!(stored("2024-03-05 19:45:12").to_entry().unwrap(), entry);
    }

    #[test]
    fn bare_date_means_midnight() {
        let entry = stored("2024-03-05").to_entry().unwrap();
        assert_eq!(
            entry.generated_at(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn totals_are_recomputed() {
        let mut row = stored("2024-03-05");
        row.total = None;
        assert_eq!(row.to_entry().unwrap().combination().sum(), 122);

        row.total = Some(1);
        assert_eq!(row.to_entry().unwrap().combination().sum(), 122);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(matches!(
            stored("yesterday").to_entry(),
            Err(LedgerRowError::InvalidTimestamp(_))
        ));

        let mut row = stored("2024-03-05");
        row.ball4 = None;
        assert!(matches!(row.to_entry(), Err(LedgerRowError::MissingPrimaries)));

        let mut row = stored("2024-03-05");
        row.bonus2 = None;
        assert!(matches!(row.to_entry(), Err(LedgerRowError::MissingBonus)));

        let mut row = stored("2024-03-05");
        row.ball2 = Some(17);
        assert!(matches!(
            row.to_entry(),
            Err(LedgerRowError::Invalid(LotoError::PrimaryDuplicate))
        ));

        let mut row = stored("2024-03-05");
        row.owner = String::new();
        assert!(matches!(
            row.to_entry(),
            Err(LedgerRowError::Invalid(LotoError::EmptyOwner))
        ));
    }
}
