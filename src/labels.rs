//! Class label table.
//!
//! Labels are loaded once at startup from a newline-delimited file shipped
//! next to the model, and are indexed by the class index the model emits.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Ordered, immutable table of class names.
#[derive(Clone, Debug)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Load labels from a newline-delimited file. Entries are trimmed and
    /// blank lines skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read label file {}", path.display()))?;
        let table = Self::from_lines(raw.lines())?;
        log::info!("loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    /// Build a table from an iterator of label lines.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(anyhow!("label table is empty"));
        }
        Ok(Self { labels })
    }

    /// Label for a class index, or `None` when the index is out of bounds.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
