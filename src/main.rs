use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use std::{
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::{fmt, EnvFilter};
use xinqing_journal::{
    Config, DateKey, Entry, HistoryRange, Items, Journal, JournalError, Storage, ITEM_SLOTS,
};

const EMPTY_SUMMARY: &str = "Leaving the day blank is an answer too.";

#[derive(Parser)]
#[command(name = "xinqing")]
#[command(version)]
#[command(about = "A small daily gratitude journal for the terminal")]
struct Cli {
    /// Directory holding the journal and its config.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's entry
    Today,
    /// Record today's gratitude items and summary
    Write {
        #[arg(short, long = "item", num_args = 1, action = clap::ArgAction::Append)]
        items: Vec<String>,
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Show days recorded, gratitude items and the current streak
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// List past entries, newest first
    History {
        /// "all" or a number of trailing days
        #[arg(short, long, default_value = "all")]
        range: String,
    },
    /// Delete every entry
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.data_dir.as_deref()).context("failed to load configuration")?;
    let mut journal = Journal::open(&config);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Today => show_today(&journal, today)?,
        Commands::Write { items, summary } => {
            if items.is_empty() && summary.is_none() {
                write_interactive(&mut journal, today)?
            } else {
                write_entry(&mut journal, today, items, summary.unwrap_or_default())?
            }
        }
        Commands::Stats { json } => show_stats(&journal, today, json)?,
        Commands::History { range } => {
            // parsing never fails, unknown selectors fall back to zero days
            let range: HistoryRange = range.parse().unwrap_or(HistoryRange::Days(0));
            list_history(&journal, range, today)?
        }
        Commands::Clear { yes } => clear_journal(&mut journal, yes)?,
    }

    Ok(())
}

fn show_today<S: Storage>(journal: &Journal<S>, today: NaiveDate) -> anyhow::Result<()> {
    let key = DateKey::from_date(today);
    println!("\n--- {} ---", key.to_display()?);
    match journal.entry_for(&key) {
        Some(entry) => print_entry_detail(entry),
        None => println!("Nothing written yet today."),
    }
    Ok(())
}

fn print_entry_detail(entry: &Entry) {
    for (i, item) in entry.items.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }
    println!("Summary: {}", entry.summary_or(EMPTY_SUMMARY));
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn write_interactive<S: Storage>(journal: &mut Journal<S>, today: NaiveDate) -> anyhow::Result<()> {
    let key = DateKey::from_date(today);
    if let Some(entry) = journal.entry_for(&key) {
        println!("You already wrote today:");
        print_entry_detail(entry);
        if !prompt("Do you want to update it? (y/n): ")?.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }

    let mut items = Vec::with_capacity(ITEM_SLOTS);
    for slot in 1..=ITEM_SLOTS {
        items.push(prompt(&format!("Grateful for #{}: ", slot))?);
    }
    let summary = prompt("One line about today (optional): ")?;

    write_entry(journal, today, items, summary)
}

fn write_entry<S: Storage>(
    journal: &mut Journal<S>,
    today: NaiveDate,
    items: Vec<String>,
    summary: String,
) -> anyhow::Result<()> {
    if items.len() > ITEM_SLOTS {
        anyhow::bail!("at most {} gratitude items per day", ITEM_SLOTS);
    }
    let mut slots = Items::default();
    for (slot, item) in slots.iter_mut().zip(items) {
        *slot = item;
    }

    match journal.submit(today, slots, &summary) {
        Ok(entry) => {
            println!(
                "Saved a gentle note for today ({} thing(s) to be grateful for).",
                entry.gratitude_count()
            );
            let stats = journal.stats(today);
            println!("Streak: {} day(s)", stats.streak);
            Ok(())
        }
        Err(JournalError::EmptySubmission) => {
            println!("{}", JournalError::EmptySubmission);
            Ok(())
        }
        Err(e) => Err(e).context("failed to save today's entry"),
    }
}

fn show_stats<S: Storage>(journal: &Journal<S>, today: NaiveDate, json: bool) -> anyhow::Result<()> {
    let stats = journal.stats(today);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n--- JOURNAL STATISTICS ---");
    println!("Days recorded: {}", stats.days);
    println!("Things you were grateful for: {}", stats.total_gratitudes);
    println!("Current streak: {} day(s)", stats.streak);
    Ok(())
}

fn list_history<S: Storage>(
    journal: &Journal<S>,
    range: HistoryRange,
    today: NaiveDate,
) -> anyhow::Result<()> {
    if journal.is_empty() {
        println!("No entries yet. Start today with one small line about something good.");
        return Ok(());
    }

    let entries = journal.history(range, today);
    if entries.is_empty() {
        println!("Nothing recorded in this range. Try recalling a good moment from the last few days.");
        return Ok(());
    }

    for entry in &entries {
        let date = entry
            .date
            .to_display()
            .unwrap_or_else(|_| entry.date.to_string());
        println!("\n{}  {}", date, entry.summary_or(EMPTY_SUMMARY));
        let items = entry.filled_items().map(|item| format!("  - {}", item)).join("\n");
        if !items.is_empty() {
            println!("{}", items);
        }
    }
    Ok(())
}

fn clear_journal<S: Storage>(journal: &mut Journal<S>, yes: bool) -> anyhow::Result<()> {
    if journal.is_empty() {
        return Ok(());
    }
    if !yes
        && !prompt("Really delete every journal entry? This cannot be undone. (y/n): ")?
            .eq_ignore_ascii_case("y")
    {
        println!("Nothing was deleted.");
        return Ok(());
    }
    journal.clear().context("failed to clear the journal")?;
    println!("Journal cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn every_subcommand_has_help_text() {
        Cli::command().debug_assert();
        for sub in Cli::command().get_subcommands() {
            assert!(sub.get_about().is_some(), "{} has no about", sub.get_name());
        }
    }

    #[test]
    fn item_flag_repeats() {
        let cli = Cli::try_parse_from(["xinqing", "write", "-i", "tea", "--item", "sun", "-s", "calm"])
            .unwrap();
        match cli.command {
            Commands::Write { items, summary } => {
                assert_eq!(items, vec!["tea", "sun"]);
                assert_eq!(summary.as_deref(), Some("calm"));
            }
            _ => panic!("expected write"),
        }
    }
}
