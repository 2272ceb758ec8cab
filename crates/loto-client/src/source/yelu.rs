use anyhow::Context as _;
use chrono::{Datelike as _, Months, NaiveDate};
use loto_combora::loto::DrawingResult;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use super::HistorySource;
use super::parse::{build_drawing, parse_date, parse_numbers};

const GAME_NAME: &str = "Loto Más";
const USER_AGENT: &str = "Mozilla/5.0";

/// Results history site, queried one month at a time.
#[derive(Debug, Clone)]
pub struct YeluHistorySource {
    client: reqwest::Client,
    url: String,
    first_month: NaiveDate,
    last_month: NaiveDate,
    pause: Duration,
}

impl YeluHistorySource {
    /// Query every month from `since` up to `until`, both inclusive.
    pub fn new(
        url: impl Into<String>,
        since: NaiveDate,
        until: NaiveDate,
        timeout: Duration,
        pause: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
            first_month: since,
            last_month: until,
            pause,
        })
    }

    async fn fetch_month(&self, month: &str) -> anyhow::Result<Vec<DrawingResult>> {
        let form = [
            ("_method", "POST"),
            ("data[Lottery][name]", GAME_NAME),
            ("data[Lottery][date]", month),
        ];
        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .with_context(|| format!("Request for {month} failed"))?;

        if !response.status().is_success() {
            anyhow::bail!("Request for {month} returned {}", response.status());
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read response for {month}"))?;
        parse_results_page(&html)
    }
}

impl HistorySource for YeluHistorySource {
    fn name(&self) -> &str {
        "remote"
    }

    /// Months that fail are skipped; the fetch fails only when all of them do.
    async fn fetch(&self) -> anyhow::Result<Vec<DrawingResult>> {
        let months = months_between(self.first_month, self.last_month);
        let mut drawings = Vec::new();
        let mut failed = 0;

        for (index, month) in months.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause).await;
            }
            log::info!("Fetching {GAME_NAME} results for {month}");
            match self.fetch_month(month).await {
                Ok(found) => {
                    log::debug!("{month}: {} drawings", found.len());
                    drawings.extend(found);
                }
                Err(e) => {
                    log::warn!("Skipping {month}: {e:#}");
                    failed += 1;
                }
            }
        }

        if !months.is_empty() && failed == months.len() {
            anyhow::bail!("All {failed} monthly requests failed");
        }

        drawings.sort_by_key(DrawingResult::date);
        drawings.dedup_by_key(|d| d.date());
        Ok(drawings)
    }
}

/// `YYYY-MM` labels from the month of `since` to the month of `until`,
/// newest first.
pub fn months_between(since: NaiveDate, until: NaiveDate) -> Vec<String> {
    let mut months = Vec::new();
    let Some(mut cursor) = since.with_day(1) else {
        return months;
    };
    while cursor <= until {
        months.push(format!("{:04}-{:02}", cursor.year(), cursor.month()));
        let Some(next) = cursor.checked_add_months(Months::new(1)) else {
            break;
        };
        cursor = next;
    }
    months.reverse();
    months
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {css}: {e:?}"))
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<Vec<_>>().join(" ")
}

/// Drawings in the `<tr>` rows of a results page: date, game, numbers.
/// Rows of other games are ignored; unreadable rows are skipped with a warning.
pub fn parse_results_page(html: &str) -> anyhow::Result<Vec<DrawingResult>> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut drawings = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }

        let game = cell_text(&cells[1]).to_lowercase();
        if !game.contains("loto") || game.contains("pool") {
            continue;
        }

        let date_text = cell_text(&cells[0]);
        let parsed = parse_date(&date_text)
            .and_then(|date| build_drawing(date, &parse_numbers(&cell_text(&cells[2]))));
        match parsed {
            Ok(drawing) => drawings.push(drawing),
            Err(e) => log::warn!("Skipping result row '{}': {e}", date_text.trim()),
        }
    }
    Ok(drawings)
}
