//! Duplicate gloss detection.
//!
//! Read-only scan over the normalized collection: entries sharing an
//! identical canonical gloss in the same language form a duplicate group,
//! annotated with each member's `is_old` flag and a summary of its
//! semantics so a reviewer can judge whether the collision is an old
//! symbol superseded by a new one or a data error.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

use crate::model::{Dictionary, SymbolEntry};

/// Entries sharing one canonical gloss in one language.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub language: String,
    pub canonical_gloss: String,
    pub members: Vec<GroupMember>,
}

/// One entry participating in a duplicate group.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupMember {
    pub id: String,
    pub is_old: bool,
    /// Human-readable semantics rendering; omitted when the entry carries
    /// no semantics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantics_summary: Option<String>,
}

/// Counters for the report stage.
#[derive(Serialize, Debug, Clone, Default)]
pub struct ReportStats {
    pub entries_scanned: usize,
    pub groups_total: usize,
    pub groups_by_language: BTreeMap<String, usize>,
}

/// Scan the collection and build the duplicate-group report.
///
/// Groups are emitted sorted by language, canonical gloss, then member id,
/// so repeated runs over unchanged input are byte-identical.
pub fn find_duplicates(dictionary: &Dictionary) -> (Vec<DuplicateGroup>, ReportStats) {
    // (language, gloss) -> ids; the BTreeMap key order is already the
    // required language-then-gloss report order.
    let mut index: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();

    for (id, entry) in dictionary {
        for (language, glosses) in &entry.glosses {
            for gloss in glosses {
                if gloss.is_empty() {
                    continue;
                }
                index
                    .entry((language.as_str(), gloss.as_str()))
                    .or_default()
                    .push(id.as_str());
            }
        }
    }

    let mut groups = Vec::new();
    for ((language, gloss), mut ids) in index {
        ids.sort_by(|a, b| compare_ids(a, b));
        ids.dedup();
        if ids.len() < 2 {
            continue;
        }

        let members = ids
            .iter()
            .map(|id| {
                let entry = &dictionary[*id];
                GroupMember {
                    id: (*id).to_string(),
                    is_old: entry.is_old,
                    semantics_summary: semantics_summary(entry),
                }
            })
            .collect();

        groups.push(DuplicateGroup {
            language: language.to_string(),
            canonical_gloss: gloss.to_string(),
            members,
        });
    }

    let mut stats = ReportStats {
        entries_scanned: dictionary.len(),
        groups_total: groups.len(),
        ..ReportStats::default()
    };
    for group in &groups {
        *stats
            .groups_by_language
            .entry(group.language.clone())
            .or_default() += 1;
    }

    info!(
        entries_scanned = stats.entries_scanned,
        groups_total = stats.groups_total,
        "duplicate scan complete"
    );
    for (language, count) in &stats.groups_by_language {
        info!(language = %language, groups = count, "duplicate groups per language");
    }

    (groups, stats)
}

/// Render an entry's semantics as `"K: v, K2: v2"` with sorted keys.
/// Absent or empty semantics degrade to `None`, never an error.
fn semantics_summary(entry: &SymbolEntry) -> Option<String> {
    if entry.semantics.is_empty() {
        return None;
    }
    let parts: Vec<String> = entry
        .semantics
        .iter()
        .map(|(key, value)| format!("{key}: {}", render_value(value)))
        .collect();
    Some(parts.join(", "))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Order ids numerically when both parse as integers; numeric ids sort
/// before non-numeric ones, which fall back to lexicographic order.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(glosses: &[(&str, &[&str])], is_old: bool) -> SymbolEntry {
        SymbolEntry {
            is_old,
            glosses: glosses
                .iter()
                .map(|(lang, list)| {
                    (
                        lang.to_string(),
                        list.iter().map(|g| g.to_string()).collect(),
                    )
                })
                .collect(),
            ..SymbolEntry::default()
        }
    }

    #[test]
    fn shared_gloss_forms_one_group_with_annotations() {
        let mut dictionary = Dictionary::new();
        dictionary.insert("1".to_string(), entry(&[("en", &["dog"])], true));
        dictionary.insert("2".to_string(), entry(&[("en", &["dog"])], false));

        let (groups, stats) = find_duplicates(&dictionary);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.language, "en");
        assert_eq!(group.canonical_gloss, "dog");
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[0].id, "1");
        assert!(group.members[0].is_old);
        assert_eq!(group.members[1].id, "2");
        assert!(!group.members[1].is_old);
        assert_eq!(stats.groups_total, 1);
        assert_eq!(stats.groups_by_language["en"], 1);
    }

    #[test]
    fn same_gloss_different_language_is_not_a_duplicate() {
        let mut dictionary = Dictionary::new();
        dictionary.insert("1".to_string(), entry(&[("en", &["gift"])], false));
        dictionary.insert("2".to_string(), entry(&[("de", &["gift"])], false));

        let (groups, _) = find_duplicates(&dictionary);
        assert!(groups.is_empty());
    }

    #[test]
    fn groups_sorted_by_language_then_gloss_then_id() {
        let mut dictionary = Dictionary::new();
        dictionary.insert(
            "10".to_string(),
            entry(&[("sv", &["hund"]), ("en", &["dog", "cat"])], false),
        );
        dictionary.insert(
            "2".to_string(),
            entry(&[("sv", &["hund"]), ("en", &["dog", "cat"])], false),
        );

        let (groups, _) = find_duplicates(&dictionary);
        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.language.as_str(), g.canonical_gloss.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("en", "cat"), ("en", "dog"), ("sv", "hund")]
        );
        // Numeric-aware: 2 before 10.
        let ids: Vec<&str> = groups[0].members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10"]);
    }

    #[test]
    fn empty_glosses_never_reported() {
        let mut dictionary = Dictionary::new();
        dictionary.insert("1".to_string(), entry(&[("en", &[""])], false));
        dictionary.insert("2".to_string(), entry(&[("en", &[""])], false));

        let (groups, _) = find_duplicates(&dictionary);
        assert!(groups.is_empty());
    }

    #[test]
    fn semantics_summary_present_only_when_semantics_exist() {
        let mut with_semantics = entry(&[("en", &["dog"])], false);
        with_semantics
            .semantics
            .insert("POS".to_string(), serde_json::json!("noun"));
        with_semantics
            .semantics
            .insert("TYPE_SHIFT".to_string(), serde_json::json!("concretization"));

        let mut dictionary = Dictionary::new();
        dictionary.insert("1".to_string(), with_semantics);
        dictionary.insert("2".to_string(), entry(&[("en", &["dog"])], false));

        let (groups, _) = find_duplicates(&dictionary);
        let members = &groups[0].members;
        assert_eq!(
            members[0].semantics_summary.as_deref(),
            Some("POS: noun, TYPE_SHIFT: concretization")
        );
        assert_eq!(members[1].semantics_summary, None);

        let rendered = serde_json::to_value(&members[1]).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({"id": "2", "is_old": false})
        );
    }

    #[test]
    fn detector_does_not_mutate_input() {
        let mut dictionary = Dictionary::new();
        dictionary.insert("1".to_string(), entry(&[("en", &["dog"])], false));
        dictionary.insert("2".to_string(), entry(&[("en", &["dog"])], false));
        let before = dictionary.clone();

        let _ = find_duplicates(&dictionary);
        assert_eq!(dictionary, before);
    }

    #[test]
    fn detector_output_is_deterministic() {
        let mut dictionary = Dictionary::new();
        for id in ["7", "3", "11", "2"] {
            dictionary.insert(id.to_string(), entry(&[("en", &["dog"])], false));
        }

        let (first, _) = find_duplicates(&dictionary);
        let (second, _) = find_duplicates(&dictionary);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        let ids: Vec<&str> = first[0].members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "7", "11"]);
    }

    #[test]
    fn numeric_ids_sort_before_lexicographic_ones() {
        assert_eq!(compare_ids("2", "10"), Ordering::Less);
        assert_eq!(compare_ids("10", "B-1"), Ordering::Less);
        assert_eq!(compare_ids("B-1", "A-2"), Ordering::Greater);
        assert_eq!(compare_ids("5", "5"), Ordering::Equal);
    }
}
