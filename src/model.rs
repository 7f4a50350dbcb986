use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Symbol collection keyed by entry id.
///
/// A `BTreeMap` keeps serialization order stable, so repeated runs over
/// unchanged input produce byte-identical files.
pub type Dictionary = BTreeMap<String, SymbolEntry>;

/// One symbol's complete metadata record.
///
/// Fields this pipeline does not know about round-trip untouched through
/// `extra`; merging never drops anything present on the base entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SymbolEntry {
    /// Legacy/deprecated symbol, superseded by a newer one.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_old: bool,

    /// Part-of-speech colour tag (`RED`, `YELLOW`, `BLUE`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_colour: Option<String>,

    /// Component symbol ids this symbol is composed from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composition: Vec<i64>,

    /// Compositional-meaning sub-object, opaque except as a grouping key.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub semantics: Map<String, Value>,

    /// Language code -> ordered canonical gloss strings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub glosses: BTreeMap<String, Vec<String>>,

    /// Language code -> case-preserved display forms, aligned with
    /// `glosses`. Omitted for a language whose display forms equal the
    /// canonical forms.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub display_glosses: BTreeMap<String, Vec<String>>,

    /// Everything else on the entry (presentation attributes and the like).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Read a symbol collection from a JSON file keyed by entry id.
///
/// Any structural mismatch is fatal; row-scoped problems are handled by the
/// stages, not here.
pub fn read_dictionary(path: &Path) -> Result<Dictionary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dictionary file {}", path.display()))?;
    let dictionary: Dictionary = serde_json::from_str(&raw)
        .with_context(|| format!("malformed dictionary JSON in {}", path.display()))?;
    Ok(dictionary)
}

/// Write a symbol collection as pretty-printed JSON, atomically.
pub fn write_dictionary(path: &Path, dictionary: &Dictionary) -> Result<()> {
    write_json_atomic(path, dictionary)
}

/// Serialize `value` and write it via a temp file in the same directory,
/// then rename over the destination. A failed run leaves no partial output.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize output for {}", path.display()))?;
    content.push('\n');

    let tmp_path = temp_sibling_path(path);
    fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}

/// Temp path next to the destination; rename only stays atomic within one
/// directory.
fn temp_sibling_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    path.with_file_name(format!(".{file_name}.tmp"))
}
