use chrono::NaiveDate;
use loto_combora::loto::{DrawingResult, LotoError, PRIMARY_COUNT};

/// Six primaries plus the two bonuses.
const NUMBERS_PER_DRAWING: usize = PRIMARY_COUNT + 2;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unreadable date '{0}'")]
    InvalidDate(String),
    #[error("Expected 8 numbers, found {0}")]
    NotEnoughNumbers(usize),
    #[error(transparent)]
    Invalid(#[from] LotoError),
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

/// Accepts `2024-03-05` and Spanish long dates such as `5 de marzo de 2024`
/// or `Martes, 5 de marzo 2024`.
pub fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.')
        .filter(|w| !w.is_empty() && *w != "de" && *w != "del")
        .collect();

    words
        .windows(3)
        .find_map(|w| {
            let day = w[0].parse::<u32>().ok().filter(|_| w[0].len() <= 2)?;
            let month = month_number(w[1])?;
            let year = w[2].parse::<i32>().ok().filter(|_| w[2].len() == 4)?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .ok_or_else(|| ParseError::InvalidDate(text.to_owned()))
}

/// Every run of digits in `text` that fits a ball, in order.
pub fn parse_numbers(text: &str) -> Vec<u8> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<u8>().ok())
        .collect()
}

/// Six primaries then the two bonuses; extra numbers are ignored.
pub fn build_drawing(date: NaiveDate, numbers: &[u8]) -> Result<DrawingResult, ParseError> {
    if numbers.len() < NUMBERS_PER_DRAWING {
        return Err(ParseError::NotEnoughNumbers(numbers.len()));
    }
    Ok(DrawingResult::new(
        date,
        &numbers[..PRIMARY_COUNT],
        numbers[PRIMARY_COUNT],
        numbers[PRIMARY_COUNT + 1],
    )?)
}
