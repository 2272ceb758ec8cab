use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use console::style;
use loto_client::service::{PlayOutcome, RefreshOutcome};
use loto_combora::frequency::FrequencyTable;
use loto_combora::generator::Generation;
use loto_combora::ledger::LedgerEntry;
use loto_combora::loto::DrawingResult;
use loto_combora::oracle::{EntryMarks, MatchReport};
use serde::Serialize;

const BAR_WIDTH: u32 = 30;
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn numbers_text(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn display_refresh(outcome: &RefreshOutcome) {
    if outcome.success {
        println!("{} {}", style("✔").green(), outcome.message);
    } else {
        println!("{} {}", style("✘").red(), style(&outcome.message).red());
    }
}

fn entries_table(entries: &[&LedgerEntry]) -> Table {
    let mut table = new_table(vec!["#", "Owner", "Numbers", "Bonus", "Sum"]);
    for (i, entry) in entries.iter().enumerate() {
        let combination = entry.combination();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(entry.owner()),
            Cell::new(numbers_text(combination.primaries())).add_attribute(Attribute::Bold),
            Cell::new(format!("{:02} {:02}", combination.bonus1(), combination.bonus2())),
            Cell::new(combination.sum()),
        ]);
    }
    table
}

fn display_generation_summary(generation: &Generation) {
    let stats = generation.stats();
    println!(
        "{} accepted out of {} trials",
        generation.combinations().len(),
        generation.attempts()
    );
    if stats.total() > 0 {
        println!(
            "  rejected: clone {}, repeat {}, sum {}, parity {}, endings {}, consecutive {}, overlap {}",
            stats.anti_clone,
            stats.anti_repeat,
            stats.sum_out_of_range,
            stats.parity,
            stats.endings,
            stats.consecutive,
            stats.overlapping
        );
    }
    if generation.is_partial() {
        println!(
            "{}",
            style(format!(
                "Only {} of {} combinations satisfied the filters ({} short)",
                generation.combinations().len(),
                generation.requested(),
                generation.shortfall()
            ))
            .yellow()
        );
    }
}

fn display_persistence(outcome: &PlayOutcome) {
    if !outcome.persisted {
        println!(
            "{}",
            style("The ledger could not be written; these plays are kept for this run only").red()
        );
    }
}

pub fn display_play(outcome: &PlayOutcome) {
    let entries: Vec<&LedgerEntry> = outcome.entries.iter().collect();
    println!("{table}", table = entries_table(&entries));
    display_generation_summary(&outcome.generation);
    display_persistence(outcome);
}

pub fn display_syndicate(outcome: &PlayOutcome, owners: &[&str]) {
    for owner in owners {
        let entries: Vec<&LedgerEntry> = outcome
            .entries
            .iter()
            .filter(|entry| entry.owner() == *owner)
            .collect();
        println!("\n{}", style(format!("== {owner} ==")).cyan().bold());
        if entries.is_empty() {
            println!("{}", style("No combinations left for this player").yellow());
        } else {
            println!("{}", entries_table(&entries));
        }
    }
    println!();
    display_generation_summary(&outcome.generation);
    display_persistence(outcome);
}

pub fn display_reports(reports: &[MatchReport]) {
    if reports.is_empty() {
        println!("No ledger entry has matched three or more numbers yet");
        return;
    }

    let mut table = new_table(vec!["Drawing", "Owner", "Played", "Hits", "Numbers", "Level"]);
    for report in reports {
        let level = Cell::new(report.level.description());
        let level = if report.is_full() {
            level.fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            level.fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(report.drawing_date.format(DATE_FORMAT)),
            Cell::new(&report.owner),
            Cell::new(report.generated_at.format(TIMESTAMP_FORMAT)),
            Cell::new(report.hit_count),
            Cell::new(numbers_text(&report.hit_numbers)).fg(Color::Green),
            level,
        ]);
    }
    println!("{table}");

    let full = reports.iter().filter(|report| report.is_full()).count();
    if full > 0 {
        println!("{}", style(format!("{full} full match(es)!")).red().bold());
    }
}

pub fn display_vault(vault: &[(LedgerEntry, EntryMarks)]) {
    if vault.is_empty() {
        println!("The ledger is empty");
        return;
    }

    let mut table = new_table(vec!["Played", "Owner", "Numbers", "Bonus", "Hits", "Status"]);
    for (entry, marks) in vault {
        let combination = entry.combination();
        let status = if marks.burned {
            Cell::new("BURNED").fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            Cell::new("open")
        };
        table.add_row(vec![
            Cell::new(entry.generated_at().format(TIMESTAMP_FORMAT)),
            Cell::new(entry.owner()),
            Cell::new(numbers_text(combination.primaries())),
            Cell::new(format!("{:02} {:02}", combination.bonus1(), combination.bonus2())),
            Cell::new(numbers_text(&marks.hits.to_vec())).fg(Color::Green),
            status,
        ]);
    }
    println!("{table}");
}

/// Bar length for `appearances` scaled against the most drawn number.
pub fn bar_length(appearances: u32, max: u32) -> usize {
    if max == 0 {
        return 0;
    }
    usize::try_from(appearances * BAR_WIDTH / max).unwrap_or_default()
}

pub fn display_frequency(table: &FrequencyTable) {
    if table.is_empty() {
        println!("No drawings in the analysis window; run `loto sync` first");
        return;
    }

    println!("Frequency over {} drawings\n", table.total_draws());
    let max = table.max_appearances();
    let mut out = new_table(vec!["Number", "Times", "Share", ""]);
    for row in table.by_number() {
        let share = f64::from(row.appearances) * 100.0 / table.total_draws() as f64;
        out.add_row(vec![
            Cell::new(format!("{:02}", row.number)),
            Cell::new(row.appearances),
            Cell::new(format!("{share:.1}%")),
            Cell::new("█".repeat(bar_length(row.appearances, max))).fg(Color::Cyan),
        ]);
    }
    println!("{out}");
}

pub fn display_history(drawings: &[DrawingResult]) {
    if drawings.is_empty() {
        println!("No drawings stored; run `loto sync` first");
        return;
    }

    let mut table = new_table(vec!["Date", "Numbers", "Bonus", "Sum"]);
    for drawing in drawings {
        let sum: u16 = drawing.primaries().iter().map(|&n| u16::from(n)).sum();
        table.add_row(vec![
            Cell::new(drawing.date().format(DATE_FORMAT)),
            Cell::new(numbers_text(drawing.primaries())).add_attribute(Attribute::Bold),
            Cell::new(format!("{:02} {:02}", drawing.bonus1(), drawing.bonus2())),
            Cell::new(sum),
        ]);
    }
    println!("{table}");
}
