//! Report rendering.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::scan::error::ScanResult;
use crate::storage::{CommitId, SubmodulePath, TagLookup};

/// How a report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Line oriented, human readable
    #[default]
    Text,
    /// One pretty-printed JSON document
    Json,
}

/// One changed submodule.
#[derive(Debug, Clone)]
pub struct SubmoduleUpdate {
    pub path: SubmodulePath,
    pub commit: CommitId,
    pub tag: TagLookup,
}

impl SubmoduleUpdate {
    /// why the checkout could not be read, if it couldn't
    pub fn unavailable(&self) -> Option<&str> {
        match &self.tag {
            TagLookup::Unavailable(reason) => Some(reason.as_str()),
            TagLookup::Found(_) | TagLookup::NoTags => None,
        }
    }
}

// `latest_tag` is null unless a tag was found; `unavailable` carries the reason
// an unreadable checkout was skipped
impl Serialize for SubmoduleUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SubmoduleUpdate", 4)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("commit", &self.commit)?;
        state.serialize_field("latest_tag", &self.tag.tag())?;
        state.serialize_field("unavailable", &self.unavailable())?;
        state.end()
    }
}

/// The result of one scan, sorted by submodule path.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// start revision as given
    pub start: String,
    /// end revision as given
    pub end: String,
    pub start_id: CommitId,
    pub end_id: CommitId,
    pub commits_scanned: usize,
    pub updates: Vec<SubmoduleUpdate>,
}

impl ScanReport {
    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> ScanResult<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
        }
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Submodules updated between commits {} and {}:", self.start, self.end)?;
        for update in &self.updates {
            writeln!(f, "Submodule: {}, Updated Commit: {}", update.path, update.commit)?;
            match update.tag.tag() {
                Some(tag) => writeln!(f, "Latest Tag for {}: {}", update.path, tag.name)?,
                None => writeln!(f, "No tags found for submodule: {}", update.path)?,
            }
            if update.unavailable().is_some() {
                writeln!(f, "Submodule checkout unavailable: {}", update.path)?;
            }
            writeln!(f, "---")?;
        }
        Ok(())
    }
}
