use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

use super::clock::{locate_at, NowCell};
use super::layout::{layout, GridLayout};
use super::stats::{aggregate, Statistics};
use super::types::{ScheduleDocument, ScheduleError};

/// Shown when the initial load fails and the built-in week is used instead.
pub const LOAD_FALLBACK_WARNING: &str = "Error loading schedule data. Using default data.";

/// Sole owner of the schedule shown by the app.
///
/// The document is only ever swapped as a whole. Layout and statistics are
/// recomputed on every swap and never patched, so they always describe the
/// current document.
pub struct ScheduleStore {
    document: ScheduleDocument,
    layout: GridLayout,
    statistics: Statistics,
    last_updated: DateTime<Local>,
}

impl ScheduleStore {
    pub fn new(document: ScheduleDocument) -> Self {
        let layout = layout(&document);
        let statistics = aggregate(&document.activities);
        Self {
            document,
            layout,
            statistics,
            last_updated: Local::now(),
        }
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.document
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn last_updated(&self) -> DateTime<Local> {
        self.last_updated
    }

    /// Swap in an already-validated document.
    pub fn replace(&mut self, document: ScheduleDocument) {
        *self = Self::new(document);
    }

    /// Validate `text` and swap it in. On error nothing changes.
    pub fn replace_from_json(&mut self, text: &str) -> Result<(), ScheduleError> {
        let document = ScheduleDocument::from_json(text).inspect_err(|e| {
            warn!("rejected schedule update: {}", e);
        })?;
        self.replace(document);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.replace(ScheduleDocument::default());
    }

    /// Recompute derived data without touching the document.
    pub fn refresh(&mut self) {
        self.layout = layout(&self.document);
        self.statistics = aggregate(&self.document.activities);
    }

    pub fn now_cell(&self, now: NaiveDateTime) -> Option<NowCell> {
        locate_at(&self.document, now)
    }

    pub fn to_pretty_json(&self) -> Result<String, ScheduleError> {
        self.document.to_pretty_json()
    }

    /// Read a user-chosen file and swap it in. The current document is kept
    /// when the file cannot be read or fails validation.
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Error reading the file {}", path.display()))?;
        self.replace_from_json(&text)
            .with_context(|| format!("Invalid JSON file structure in {}", path.display()))?;
        info!("imported schedule from {}", path.display());
        Ok(())
    }

    /// Write the document as pretty JSON to a user-chosen path, creating
    /// missing parent directories.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        }

        let json = self.to_pretty_json().context("Failed to serialize schedule")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        info!("exported schedule to {}", path.display());
        Ok(())
    }

    /// Take the outcome of the initial load. A failure falls back to the
    /// built-in week and returns the warning to show.
    pub fn apply_load(&mut self, result: Result<ScheduleDocument>) -> Option<&'static str> {
        match result {
            Ok(document) => {
                self.replace(document);
                None
            }
            Err(e) => {
                error!("{:#}", e);
                self.reset();
                Some(LOAD_FALLBACK_WARNING)
            }
        }
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new(ScheduleDocument::default())
    }
}

/// `<stem>-YYYY-MM-DD.<ext>`
pub fn dated_file_name(stem: &str, date: NaiveDate, ext: &str) -> String {
    format!("{}-{}.{}", stem, date.format("%Y-%m-%d"), ext)
}
