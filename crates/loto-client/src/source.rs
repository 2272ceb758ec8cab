//! Where drawing history comes from.

use loto_combora::loto::DrawingResult;

pub mod csv_file;
pub mod parse;
pub mod yelu;

pub use csv_file::CsvHistorySource;
pub use yelu::YeluHistorySource;

/// A provider of past drawings. Rows that cannot form a valid drawing are
/// dropped with a warning before they are returned.
#[expect(async_fn_in_trait)]
pub trait HistorySource {
    /// Short label for log lines and refresh messages.
    fn name(&self) -> &str;

    async fn fetch(&self) -> anyhow::Result<Vec<DrawingResult>>;
}
