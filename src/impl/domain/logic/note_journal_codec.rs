use std::sync::LazyLock;

use chrono::NaiveDateTime;
use fractic_server_error::ServerError;
use regex::Regex;

use crate::{entities::NoteEntry, errors::NoteNotFound};

/// Default display format of a note stamp, e.g. "Mar 5, 2024 14:30".
pub const DEFAULT_NOTE_STAMP_FORMAT: &str = "%b %-d, %Y %H:%M";

const ENTRY_BOUNDARY: &str = "\n\n[";

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\[([^\]\n]*)\]\s?(.*)$").expect("hardcoded regex should be valid")
});

/// Reads and writes the note journal kept in a client's single notes column.
///
/// The blob is a newest-first sequence of entries of the form
/// `[<stamp>] <content>\n\n`. Entries are only addressable by their position
/// in the decoded list.
#[derive(Debug, Clone)]
pub struct NoteJournalCodec {
    stamp_format: String,
}

impl Default for NoteJournalCodec {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_STAMP_FORMAT)
    }
}

impl NoteJournalCodec {
    /// `stamp_format` is a chrono format string and is expected to be valid
    /// (see [`crate::config::CoachlyticConfig::validate`]).
    pub fn new(stamp_format: impl Into<String>) -> Self {
        Self {
            stamp_format: stamp_format.into(),
        }
    }

    pub fn stamp_format(&self) -> &str {
        &self.stamp_format
    }

    pub fn stamp(&self, now: NaiveDateTime) -> String {
        now.format(&self.stamp_format).to_string()
    }

    /// Parses a stamp produced by [`Self::stamp`] back into a timestamp.
    pub fn parse_stamp(&self, stamp: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(stamp, &self.stamp_format).ok()
    }

    /// Prepends a new entry stamped with `now`.
    pub fn append(&self, blob: &str, content: &str, now: NaiveDateTime) -> String {
        format!("{}{}", encode_entry(&self.stamp(now), content), blob)
    }

    pub fn decode(&self, blob: &str) -> Vec<NoteEntry> {
        decode(blob)
    }

    /// Replaces the content of the entry at `index`, keeping its stamp.
    pub fn edit_by_index(
        &self,
        blob: &str,
        index: usize,
        new_content: &str,
    ) -> Result<String, ServerError> {
        let mut entries = decode(blob);
        let len = entries.len();
        let entry = entries
            .get_mut(index)
            .ok_or_else(|| NoteNotFound::new(index, len))?;
        entry.content = new_content.trim().to_string();
        Ok(encode(&entries))
    }

    pub fn delete_by_index(&self, blob: &str, index: usize) -> Result<String, ServerError> {
        let mut entries = decode(blob);
        if index >= entries.len() {
            return Err(NoteNotFound::new(index, entries.len()));
        }
        entries.remove(index);
        Ok(encode(&entries))
    }
}

fn encode_entry(stamp: &str, content: &str) -> String {
    format!("[{}] {}\n\n", stamp, content)
}

/// Concatenates entries in their current order.
pub fn encode(entries: &[NoteEntry]) -> String {
    entries
        .iter()
        .map(|e| encode_entry(&e.date, &e.content))
        .collect()
}

/// Splits the blob at each `\n\n[` boundary and keeps the segments that look
/// like `[<stamp>] <content>`. Anything else is skipped, so a blob written
/// outside the journal format decodes to fewer (or no) entries.
pub fn decode(blob: &str) -> Vec<NoteEntry> {
    let mut segments = Vec::new();
    let mut start = 0;
    while let Some(offset) = blob[start..].find(ENTRY_BOUNDARY) {
        let boundary = start + offset;
        segments.push(&blob[start..boundary]);
        // Keep the '[' with the next segment.
        start = boundary + ENTRY_BOUNDARY.len() - 1;
    }
    segments.push(&blob[start..]);

    segments
        .into_iter()
        .map(str::trim_start)
        .filter_map(|segment| {
            ENTRY_PATTERN.captures(segment).map(|caps| NoteEntry {
                date: caps[1].to_string(),
                content: caps[2].trim().to_string(),
            })
        })
        .collect()
}
