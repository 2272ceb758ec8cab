use chrono::{NaiveDate, NaiveDateTime};
use loto_client::db;
use loto_client::service::{load_history, refresh_history};
use loto_client::source::HistorySource;
use loto_combora::loto::DrawingResult;

struct FixedSource(Vec<DrawingResult>);

impl HistorySource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self) -> anyhow::Result<Vec<DrawingResult>> {
        Ok(self.0.clone())
    }
}

struct BrokenSource;

impl HistorySource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn fetch(&self) -> anyhow::Result<Vec<DrawingResult>> {
        anyhow::bail!("connection refused")
    }
}

fn drawing(d: u32, primaries: [u8; 6]) -> DrawingResult {
    let date = NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    DrawingResult::new(date, &primaries, 2, 7).unwrap()
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn refresh_is_idempotent() -> anyhow::Result<()> {
    let pool = db::create_pool(":memory:", 1)?;
    let source = FixedSource(vec![
        drawing(2, [3, 11, 18, 24, 30, 37]),
        drawing(6, [1, 7, 15, 22, 29, 40]),
    ]);

    let first = refresh_history(&pool, &source, now()).await;
    assert!(first.success);
    assert_eq!(first.inserted, 2);

    let again = refresh_history(&pool, &source, now()).await;
    assert!(again.success);
    assert_eq!(again.inserted, 0);

    let history = load_history(&mut *db::get_connection(&pool)?);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].primaries(), &[3, 11, 18, 24, 30, 37]);
    Ok(())
}

#[tokio::test]
async fn failures_are_reported_not_raised() -> anyhow::Result<()> {
    let pool = db::create_pool(":memory:", 1)?;

    let outcome = refresh_history(&pool, &BrokenSource, now()).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("connection refused"));

    let outcome = refresh_history(&pool, &FixedSource(Vec::new()), now()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.inserted, 0);

    assert!(load_history(&mut *db::get_connection(&pool)?).is_empty());
    Ok(())
}
