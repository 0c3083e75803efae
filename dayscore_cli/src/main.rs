use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dayscore_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dayscore")]
#[command(about = "Daily nutrition adherence and scoring tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log an amount against a category
    Log {
        /// Category id (e.g. vegetables, water, treats)
        category: String,

        /// Amount in the category's unit; snapped to the 0.1 increment
        amount: f64,

        /// Meal slot (breakfast, lunch, dinner, snack)
        #[arg(long, default_value = "snack")]
        slot: String,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,

        /// Day to log for (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the day's adherence verdicts and blended score
    Score {
        /// Day to evaluate (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record body metrics for a day
    Metric {
        #[arg(long)]
        weight_kg: Option<f64>,

        #[arg(long)]
        muscle_kg: Option<f64>,

        #[arg(long)]
        body_fat_pct: Option<f64>,

        #[arg(long)]
        waist_cm: Option<f64>,

        #[arg(long)]
        steps: Option<f64>,

        #[arg(long)]
        active_energy_kcal: Option<f64>,

        /// Day the measurements belong to (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show trailing 7-day body metric averages
    Trend {
        /// Window end date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Roll up journal entries to CSV
    Rollup {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

fn main() -> Result<()> {
    dayscore_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = config.catalog();
    let mut errors = catalog.validate();
    errors.extend(config.validate(&catalog));
    if !errors.is_empty() {
        eprintln!("Configuration validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Validation("Invalid configuration".into()));
    }

    match cli.command {
        Commands::Log {
            category,
            amount,
            slot,
            note,
            date,
        } => cmd_log(&data_dir, &catalog, category, amount, slot, note, date),
        Commands::Score { date } => cmd_score(&data_dir, &catalog, &config, date),
        Commands::Metric {
            weight_kg,
            muscle_kg,
            body_fat_pct,
            waist_cm,
            steps,
            active_energy_kcal,
            date,
        } => cmd_metric(
            &data_dir,
            BodyMetricEntry {
                day: date.unwrap_or_else(today),
                weight_kg,
                muscle_kg,
                body_fat_pct,
                waist_cm,
                steps,
                active_energy_kcal,
            },
        ),
        Commands::Trend { date } => cmd_trend(&data_dir, date),
        Commands::Rollup { cleanup } => cmd_rollup(&data_dir, cleanup),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn journal_path(data_dir: &PathBuf) -> PathBuf {
    data_dir.join("journal").join("entries.jsonl")
}

fn parse_slot(slot: &str) -> MealSlot {
    match slot.to_lowercase().as_str() {
        "breakfast" => MealSlot::Breakfast,
        "lunch" => MealSlot::Lunch,
        "dinner" => MealSlot::Dinner,
        "snack" => MealSlot::Snack,
        other => {
            eprintln!("Unknown meal slot '{}', using snack", other);
            MealSlot::Snack
        }
    }
}

fn cmd_log(
    data_dir: &PathBuf,
    catalog: &Catalog,
    category: String,
    amount: f64,
    slot: String,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let Some(cat) = catalog.categories.get(&category) else {
        eprintln!("Unknown category '{}'. Known categories:", category);
        for known in catalog.enabled_categories() {
            eprintln!("  {} ({})", known.id, known.rule.display_text(&known.unit));
        }
        return Err(Error::UnknownCategory(category));
    };

    let day = date.unwrap_or_else(today);
    let portion = Portion::new(amount);

    let entry = DailyLogEntry {
        id: uuid::Uuid::new_v4(),
        category_id: cat.id.clone(),
        day,
        slot: parse_slot(&slot),
        portion,
        raw_amount: Some(amount),
        raw_unit: Some(cat.unit.clone()),
        note,
        food_id: None,
        logged_at: Utc::now(),
    };

    let mut journal = JsonlJournal::new(journal_path(data_dir));
    journal.append(&entry)?;

    println!(
        "✓ Logged {} {} for {} on {}",
        portion.value(),
        cat.unit,
        cat.name,
        day
    );
    Ok(())
}

fn cmd_score(
    data_dir: &PathBuf,
    catalog: &Catalog,
    config: &Config,
    date: Option<NaiveDate>,
) -> Result<()> {
    let day = date.unwrap_or_else(today);
    let entries = entries_for_day(&journal_path(data_dir), day)?;
    let totals = totals_by_category(&entries);
    let categories = catalog.enabled_categories();

    let adherence = evaluate_adherence(&categories, &totals);
    let score = evaluate_daily_score(
        &categories,
        &totals,
        &config.profiles,
        &config.compensation_rules,
    );

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAYSCORE · {}", day);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for category in &categories {
        let detail = score
            .categories
            .iter()
            .find(|c| c.category_id == category.id);
        let Some(detail) = detail else { continue };

        let mark = if detail.target_met { "✓" } else { "✗" };
        print!(
            "  {} {:<12} {:>5.1} ({})  score {:>5.1}",
            mark,
            category.name,
            detail.total,
            category.rule.display_text(&category.unit),
            detail.final_score,
        );
        if detail.compensation_applied > 0.0 {
            print!("  (+{:.1} compensated)", detail.compensation_applied);
        }
        println!();
    }

    println!();
    if adherence.all_targets_met {
        println!("  All targets met!");
    }
    match score.overall_score {
        Some(overall) => println!("  Daily score: {:.1} / 100", overall),
        None => println!("  Daily score: n/a (no scorable categories)"),
    }
    println!();

    Ok(())
}

fn cmd_metric(data_dir: &PathBuf, entry: BodyMetricEntry) -> Result<()> {
    let path = data_dir.join("metrics.csv");
    append_metric_entry(&path, &entry)?;
    println!("✓ Recorded metrics for {}", entry.day);
    Ok(())
}

fn cmd_trend(data_dir: &PathBuf, date: Option<NaiveDate>) -> Result<()> {
    let day = date.unwrap_or_else(today);
    let entries = load_metric_entries(&data_dir.join("metrics.csv"))?;
    let averages = seven_day_averages(&entries, day);

    println!("\n7-day averages ending {}:", day);
    print_metric("weight", averages.weight_kg, "kg");
    print_metric("muscle", averages.muscle_kg, "kg");
    print_metric("body fat", averages.body_fat_pct, "%");
    print_metric("waist", averages.waist_cm, "cm");
    print_metric("steps", averages.steps, "");
    print_metric("active energy", averages.active_energy_kcal, "kcal");
    println!();

    Ok(())
}

fn print_metric(label: &str, value: Option<f64>, unit: &str) {
    match value {
        Some(v) => println!("  {:<14} {:.1} {}", label, v, unit),
        None => println!("  {:<14} –", label),
    }
}

fn cmd_rollup(data_dir: &PathBuf, cleanup: bool) -> Result<()> {
    let journal_dir = data_dir.join("journal");
    let journal_path = journal_dir.join("entries.jsonl");
    let csv_path = data_dir.join("entries.csv");

    if !journal_path.exists() {
        println!("No journal file found - nothing to roll up.");
        return Ok(());
    }

    let count = dayscore_core::rollup::journal_to_csv_and_archive(&journal_path, &csv_path)?;

    println!("✓ Rolled up {} entries to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = dayscore_core::rollup::cleanup_processed_journals(&journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}
