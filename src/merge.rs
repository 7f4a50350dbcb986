//! Merge stage: enrich a base symbol collection with glosses from the
//! tabular source.
//!
//! Merging only adds. Every field on a base entry survives, no entry is
//! created or dropped, and the output entry count always equals the base
//! entry count.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::config::MergeConfig;
use crate::gloss_table::GlossTable;
use crate::model::Dictionary;

/// Counters for the merge stage. `rows_total` reconciles against
/// `rows_matched + rows_unmatched + rows_malformed`.
#[derive(Serialize, Debug, Clone, Default)]
pub struct MergeStats {
    pub entries: usize,
    pub rows_total: usize,
    pub rows_matched: usize,
    pub rows_unmatched: usize,
    pub rows_malformed: usize,
    pub glosses_added: usize,
    pub colour_corrections_applied: usize,
    pub old_flags_set: usize,
    pub semantics_derived: usize,
}

/// Merge the gloss table into the base collection.
pub fn merge_dictionary(
    mut base: Dictionary,
    table: &GlossTable,
    config: &MergeConfig,
) -> (Dictionary, MergeStats) {
    let mut stats = MergeStats {
        entries: base.len(),
        rows_total: table.total_rows(),
        rows_malformed: table.malformed_rows,
        ..MergeStats::default()
    };

    apply_colour_corrections(&mut base, config, &mut stats);

    for row in &table.rows {
        let Some(entry) = base.get_mut(&row.id) else {
            warn!(
                id = %row.id,
                line = row.line,
                "gloss row does not match any entry, skipping"
            );
            stats.rows_unmatched += 1;
            continue;
        };
        stats.rows_matched += 1;

        let mut newly_old = false;
        for (lang, candidates) in table.languages.iter().zip(&row.cells) {
            for candidate in candidates {
                let text = match candidate.strip_suffix(config.old_marker.as_str()) {
                    Some(stripped) => {
                        newly_old = true;
                        stripped.trim_end().to_string()
                    }
                    None => candidate.clone(),
                };
                if text.is_empty() {
                    continue;
                }
                entry.glosses.entry(lang.clone()).or_default().push(text);
                stats.glosses_added += 1;
            }
        }

        if newly_old && !entry.is_old {
            entry.is_old = true;
            stats.old_flags_set += 1;
        }
    }

    derive_semantics(&mut base, config, &mut stats);

    info!(
        entries = stats.entries,
        rows_total = stats.rows_total,
        rows_matched = stats.rows_matched,
        rows_unmatched = stats.rows_unmatched,
        rows_malformed = stats.rows_malformed,
        glosses_added = stats.glosses_added,
        "merge complete"
    );
    (base, stats)
}

/// Apply the static `pos_colour` patch list before any row is merged.
fn apply_colour_corrections(base: &mut Dictionary, config: &MergeConfig, stats: &mut MergeStats) {
    for (id, colour) in &config.colour_corrections {
        match base.get_mut(id) {
            Some(entry) => {
                entry.pos_colour = Some(colour.clone());
                stats.colour_corrections_applied += 1;
            }
            None => warn!(id = %id, "colour correction for unknown entry id, skipping"),
        }
    }
}

/// Fill an empty `semantics` object from the colour tag and composition.
/// Entries arriving with semantics keep them untouched.
fn derive_semantics(base: &mut Dictionary, config: &MergeConfig, stats: &mut MergeStats) {
    for entry in base.values_mut() {
        if !entry.semantics.is_empty() {
            continue;
        }

        let mut semantics = serde_json::Map::new();
        if let Some(pos) = entry
            .pos_colour
            .as_ref()
            .and_then(|colour| config.pos_from_colour.get(colour))
        {
            semantics.insert("POS".to_string(), serde_json::Value::String(pos.clone()));
        }
        if entry
            .composition
            .contains(&config.concretization_indicator)
        {
            semantics.insert(
                "TYPE_SHIFT".to_string(),
                serde_json::Value::String("concretization".to_string()),
            );
        }

        if !semantics.is_empty() {
            entry.semantics = semantics;
            stats.semantics_derived += 1;
        }
    }
}

/// The id sets of two collections, for conservation checks in callers and
/// tests.
pub fn id_set(dictionary: &Dictionary) -> BTreeSet<&str> {
    dictionary.keys().map(String::as_str).collect()
}
