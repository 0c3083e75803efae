//! CSV rollup functionality for archiving journal entries.
//!
//! This module implements atomic journal-to-CSV conversion with proper error
//! handling to prevent data loss.

use crate::types::{DailyLogEntry, MealSlot};
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    category_id: String,
    day: String,
    slot: String,
    portion: f64,
    raw_amount: Option<f64>,
    raw_unit: Option<String>,
    note: Option<String>,
    food_id: Option<String>,
    logged_at: String,
}

fn slot_label(slot: &MealSlot) -> &'static str {
    match slot {
        MealSlot::Breakfast => "breakfast",
        MealSlot::Lunch => "lunch",
        MealSlot::Dinner => "dinner",
        MealSlot::Snack => "snack",
    }
}

impl From<&DailyLogEntry> for CsvRow {
    fn from(entry: &DailyLogEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            category_id: entry.category_id.clone(),
            day: entry.day.to_string(),
            slot: slot_label(&entry.slot).to_string(),
            portion: entry.portion.value(),
            raw_amount: entry.raw_amount,
            raw_unit: entry.raw_unit.clone(),
            note: entry.note.clone(),
            food_id: entry.food_id.clone(),
            logged_at: entry.logged_at.to_rfc3339(),
        }
    }
}

/// Roll up journal entries into CSV and archive the journal atomically
///
/// This function:
/// 1. Reads all entries from the journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to .processed
/// 5. Returns the number of entries processed
///
/// # Safety
/// - CSV is fsynced before the journal is renamed
/// - The journal is renamed (not deleted) to allow manual recovery if needed
/// - Processed journal files can be cleaned up manually
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    let entries = crate::journal::read_entries(journal_path)?;

    if entries.is_empty() {
        tracing::info!("No entries in journal to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open CSV file for appending
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Write headers only when the file is still empty
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for entry in &entries {
        let row = CsvRow::from(entry);
        writer.serialize(row)?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} entries to CSV", entries.len());

    // Atomically archive the journal by renaming it
    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(entries.len())
}

/// Clean up old processed journal files
///
/// This removes all .jsonl.processed files in the given directory.
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed journal: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntrySink, JsonlJournal};
    use crate::portion::Portion;
    use chrono::{NaiveDate, Utc};
    use std::fs::File;
    use uuid::Uuid;

    fn create_test_entry(category_id: &str) -> DailyLogEntry {
        DailyLogEntry {
            id: Uuid::new_v4(),
            category_id: category_id.into(),
            day: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot: MealSlot::Snack,
            portion: Portion::new(1.0),
            raw_amount: None,
            raw_unit: None,
            note: Some("test".into()),
            food_id: None,
            logged_at: Utc::now(),
        }
    }

    #[test]
    fn test_journal_to_csv_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");
        let csv_path = temp_dir.path().join("entries.csv");

        let mut journal = JsonlJournal::new(&journal_path);
        for i in 0..3 {
            journal
                .append(&create_test_entry(&format!("cat_{}", i)))
                .unwrap();
        }

        let count = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        assert!(csv_path.exists());

        // Verify the journal was archived
        assert!(!journal_path.exists());
        assert!(journal_path.with_extension("jsonl.processed").exists());
    }

    #[test]
    fn test_journal_to_csv_appends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");
        let csv_path = temp_dir.path().join("entries.csv");

        // First rollup
        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_entry("vegetables")).unwrap();
        let count1 = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count1, 1);

        // Second rollup (appends)
        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_entry("fruit")).unwrap();
        let count2 = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count2, 1);

        // Verify CSV has both entries
        let reader = csv::Reader::from_path(&csv_path).unwrap();
        let record_count = reader.into_records().count();
        assert_eq!(record_count, 2);
    }

    #[test]
    fn test_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("empty.jsonl");
        let csv_path = temp_dir.path().join("entries.csv");

        File::create(&journal_path).unwrap();

        let count = journal_to_csv_and_archive(&journal_path, &csv_path).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_processed_journals() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("a.jsonl.processed")).unwrap();
        File::create(temp_dir.path().join("b.jsonl.processed")).unwrap();
        File::create(temp_dir.path().join("keep.jsonl")).unwrap();

        let count = cleanup_processed_journals(temp_dir.path()).unwrap();
        assert_eq!(count, 2);

        assert!(!temp_dir.path().join("a.jsonl.processed").exists());
        assert!(!temp_dir.path().join("b.jsonl.processed").exists());
        assert!(temp_dir.path().join("keep.jsonl").exists());
    }
}
