use anyhow::Context as _;
use loto_combora::loto::DrawingResult;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use super::HistorySource;
use super::parse::{build_drawing, parse_date};

/// One line of the history file:
/// `Fecha,Bola_1,Bola_2,Bola_3,Bola_4,Bola_5,Bola_6,Loto_Mas,Super_Mas`.
#[derive(Debug, Deserialize)]
struct CsvDrawing {
    #[serde(rename = "Fecha")]
    date: String,
    #[serde(rename = "Bola_1")]
    ball1: u8,
    #[serde(rename = "Bola_2")]
    ball2: u8,
    #[serde(rename = "Bola_3")]
    ball3: u8,
    #[serde(rename = "Bola_4")]
    ball4: u8,
    #[serde(rename = "Bola_5")]
    ball5: u8,
    #[serde(rename = "Bola_6")]
    ball6: u8,
    #[serde(rename = "Loto_Mas", default)]
    bonus1: Option<u8>,
    #[serde(rename = "Super_Mas", default)]
    bonus2: Option<u8>,
}

impl CsvDrawing {
    fn to_drawing(&self) -> anyhow::Result<DrawingResult> {
        let date = parse_date(&self.date)?;
        let numbers = [
            self.ball1,
            self.ball2,
            self.ball3,
            self.ball4,
            self.ball5,
            self.ball6,
            self.bonus1.unwrap_or(0),
            self.bonus2.unwrap_or(0),
        ];
        Ok(build_drawing(date, &numbers)?)
    }
}

/// Parse history CSV from any reader. Bad lines are skipped with a warning.
pub fn parse_history_csv<R: Read>(reader: R) -> anyhow::Result<Vec<DrawingResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut drawings = Vec::new();
    for (index, record) in reader.deserialize::<CsvDrawing>().enumerate() {
        // header is line 1
        let line = index + 2;
        match record
            .map_err(anyhow::Error::from)
            .and_then(|row| row.to_drawing())
        {
            Ok(drawing) => drawings.push(drawing),
            Err(e) => log::warn!("Skipping history line {line}: {e}"),
        }
    }
    Ok(drawings)
}

/// History kept in a local CSV file.
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    path: PathBuf,
}

impl CsvHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> anyhow::Result<Vec<DrawingResult>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open history file {}", self.path.display()))?;
        let drawings = parse_history_csv(file)
            .with_context(|| format!("Failed to read history file {}", self.path.display()))?;
        log::info!("Read {} drawings from {}", drawings.len(), self.path.display());
        Ok(drawings)
    }
}

impl HistorySource for CsvHistorySource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self) -> anyhow::Result<Vec<DrawingResult>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.read())
            .await
            .context("History file reader panicked")?
    }
}
