//! The persisted vocabulary document: a JSON array of records.

use std::collections::HashSet;
use tracing::warn;

use crate::error::LexisResult;
use crate::types::VocabularyRecord;

/// Key under which the local collection is stored.
pub const STORAGE_KEY: &str = "vocabularyList";

/// Decode a document, dropping entries that break record invariants.
///
/// Entries with a blank word and repeated words (after the first) are skipped
/// with a warning; anything that is not a JSON array of records is an error.
pub fn parse_document(content: &str) -> LexisResult<Vec<VocabularyRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<VocabularyRecord> = serde_json::from_str(content)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut valid = Vec::with_capacity(records.len());

    for record in records {
        if record.word.trim().is_empty() {
            warn!("Skipping vocabulary entry with empty word");
            continue;
        }
        if !seen.insert(record.word.clone()) {
            warn!(word = %record.word, "Skipping duplicate vocabulary entry");
            continue;
        }
        valid.push(record);
    }

    Ok(valid)
}

/// Encode a collection compactly, for local storage.
pub fn to_document(records: &[VocabularyRecord]) -> LexisResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Encode a collection with two-space indentation, for the remote file.
pub fn to_pretty_document(records: &[VocabularyRecord]) -> LexisResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
