//! Daily log journal.
//!
//! Log entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Reads tolerate corrupt lines.

use crate::types::DailyLogEntry;
use crate::Result;
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Entry sink trait for persisting log entries
pub trait EntrySink {
    fn append(&mut self, entry: &DailyLogEntry) -> Result<()>;
}

/// JSONL-based entry sink with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new JSONL journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EntrySink for JsonlJournal {
    fn append(&mut self, entry: &DailyLogEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write entry as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        // Lock is automatically released when file is dropped
        file.unlock()?;

        tracing::debug!("Appended entry {} to journal", entry.id);
        Ok(())
    }
}

/// Read all entries from a journal file
pub fn read_entries(path: &Path) -> Result<Vec<DailyLogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<DailyLogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse entry at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}

/// Read only the entries logged for a specific day
pub fn entries_for_day(path: &Path, day: NaiveDate) -> Result<Vec<DailyLogEntry>> {
    let entries = read_entries(path)?;
    Ok(entries.into_iter().filter(|e| e.day == day).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portion::Portion;
    use crate::types::MealSlot;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_entry(day: NaiveDate) -> DailyLogEntry {
        DailyLogEntry {
            id: Uuid::new_v4(),
            category_id: "vegetables".into(),
            day,
            slot: MealSlot::Dinner,
            portion: Portion::new(1.5),
            raw_amount: Some(150.0),
            raw_unit: Some("g".into()),
            note: None,
            food_id: None,
            logged_at: Utc::now(),
        }
    }

    fn test_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_append_and_read_single_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");

        let entry = create_test_entry(test_day());
        let entry_id = entry.id;

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&entry).unwrap();

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
        assert_eq!(entries[0].portion.value(), 1.5);
    }

    #[test]
    fn test_append_multiple_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");

        let mut journal = JsonlJournal::new(&journal_path);
        for _ in 0..5 {
            journal.append(&create_test_entry(test_day())).unwrap();
        }

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn test_read_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("nonexistent.jsonl");

        let entries = read_entries(&journal_path).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_entries_for_day_filters() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");

        let target_day = test_day();
        let other_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_entry(target_day)).unwrap();
        journal.append(&create_test_entry(other_day)).unwrap();
        journal.append(&create_test_entry(target_day)).unwrap();

        let entries = entries_for_day(&journal_path, target_day).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.day == target_day));
    }

    #[test]
    fn test_corrupt_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("entries.jsonl");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_entry(test_day())).unwrap();

        // Inject a corrupt line between valid entries
        {
            use std::io::Write;
            let mut file = OpenOptions::new()
                .append(true)
                .open(&journal_path)
                .unwrap();
            writeln!(file, "{{ not valid json").unwrap();
        }
        journal.append(&create_test_entry(test_day())).unwrap();

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
