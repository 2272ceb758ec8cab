use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use loto_combora::loto::{DrawingResult, LotoError};

/// Stored drawing. The draw date is the key.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::models::schema::drawings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DrawingRow {
    pub draw_date: NaiveDate,
    pub ball1: i32,
    pub ball2: i32,
    pub ball3: i32,
    pub ball4: i32,
    pub ball5: i32,
    pub ball6: i32,
    pub bonus1: i32,
    pub bonus2: i32,
    pub created_time: NaiveDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum DrawingRowError {
    #[error("Stored number {0} does not fit a ball")]
    NumberOutOfRange(i32),
    #[error(transparent)]
    Invalid(#[from] LotoError),
}

fn to_ball(value: i32) -> Result<u8, DrawingRowError> {
    u8::try_from(value).map_err(|_e| DrawingRowError::NumberOutOfRange(value))
}

impl DrawingRow {
    pub fn from_drawing(drawing: &DrawingResult, created_time: NaiveDateTime) -> Self {
        let [ball1, ball2, ball3, ball4, ball5, ball6] = drawing.primaries().map(i32::from);
        Self {
            draw_date: drawing.date(),
            ball1,
            ball2,
            ball3,
            ball4,
            ball5,
            ball6,
            bonus1: i32::from(drawing.bonus1()),
            bonus2: i32::from(drawing.bonus2()),
            created_time,
        }
    }

    pub fn to_drawing(&self) -> Result<DrawingResult, DrawingRowError> {
        let balls = [
            self.ball1, self.ball2, self.ball3, self.ball4, self.ball5, self.ball6,
        ]
        .into_iter()
        .map(to_ball)
        .collect::<Result<Vec<u8>, _>>()?;
        Ok(DrawingResult::new(
            self.draw_date,
            &balls,
            to_ball(self.bonus1)?,
            to_ball(self.bonus2)?,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn row_keeps_draw_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let drawing = DrawingResult::new(date, &[30, 4, 18, 1, 22, 9], 7, 11).unwrap();
        let row = DrawingRow::from_drawing(&drawing, created());

        assert_eq!((row.ball1, row.ball6), (30, 9));
        assert_eq!(row.to_drawing().unwrap(), drawing);
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let drawing = DrawingResult::new(date, &[1, 2, 3, 4, 5, 6], 7, 11).unwrap();

        let mut row = DrawingRow::from_drawing(&drawing, created());
        row.ball3 = -1;
        assert!(matches!(
            row.to_drawing(),
            Err(DrawingRowError::NumberOutOfRange(-1))
        ));

        let mut row = DrawingRow::from_drawing(&drawing, created());
        row.bonus1 = 0;
        assert!(matches!(
            row.to_drawing(),
            Err(DrawingRowError::Invalid(LotoError::Bonus1OutOfRange(0)))
        ));
    }
}
