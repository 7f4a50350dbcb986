//! Gloss canonicalization.
//!
//! Canonicalization is a named, ordered list of pure string rules
//! ([`RULES`]), applied repeatedly until the string stops changing. Every
//! rule either preserves or shrinks its input after the first pass, so the
//! loop terminates and the whole pipeline is idempotent: normalizing an
//! already-normalized collection is byte-for-byte identity.
//!
//! Case policy: the stored gloss list holds the lowercase canonical key
//! used for matching; the case-preserved display form is kept alongside in
//! `display_glosses` whenever it differs.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeConfig;
use crate::model::Dictionary;

/// A single canonicalization rule: pure string in, string out.
pub type Rule = fn(&str) -> String;

/// The canonicalization rule list, in application order.
pub const RULES: &[(&str, Rule)] = &[
    ("nfc", nfc),
    ("replace_underscores", replace_underscores),
    ("trim", trim),
    ("collapse_whitespace", collapse_whitespace),
    ("strip_verb_marker", strip_verb_marker),
    ("normalize_quotes", normalize_quotes),
    ("strip_trailing_periods", strip_trailing_periods),
];

/// Passes after which a non-converging string is taken as-is. The rules
/// only remove characters after the first pass, so this is never reached in
/// practice.
const MAX_RULE_PASSES: usize = 8;

/// Unicode NFC so byte equality matches canonical-text equality.
fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// The source data uses `_` where glosses mean a space.
fn replace_underscores(text: &str) -> String {
    text.replace('_', " ")
}

fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Collapse internal whitespace runs to a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop the trailing infinitive marker verbs carry in the source data
/// (`run-(to)` -> `run`).
fn strip_verb_marker(text: &str) -> String {
    let mut result = text;
    while let Some(stripped) = result.strip_suffix("-(to)") {
        result = stripped.trim_end();
    }
    result.to_string()
}

/// Straighten curly quotes, then drop an edge quote whose counterpart is
/// missing. A quote character appearing an even number of times is treated
/// as intentional and kept.
fn normalize_quotes(text: &str) -> String {
    let mut result: String = text
        .chars()
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect();

    for quote in ['"', '\''] {
        if result.chars().filter(|&ch| ch == quote).count() % 2 == 1 {
            if result.starts_with(quote) {
                result.remove(0);
            } else if result.ends_with(quote) {
                result.pop();
            }
        }
    }
    result.trim().to_string()
}

/// Remove a trailing run of periods, unless that would leave nothing (a
/// bare `.` gloss stays a `.`).
fn strip_trailing_periods(text: &str) -> String {
    let stripped = text.trim_end_matches('.').trim_end();
    if stripped.is_empty() {
        text.to_string()
    } else {
        stripped.to_string()
    }
}

/// Run the full rule list to a fixed point.
pub fn apply_rules(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_RULE_PASSES {
        let next = RULES
            .iter()
            .fold(current.clone(), |acc, (_, rule)| rule(&acc));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Comparison key for a display gloss.
pub fn canonical_key(display: &str) -> String {
    display.to_lowercase()
}

static PLURAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\(s\)$").expect("plural suffix pattern"));

/// Canonicalize one raw gloss into its ordered display candidates.
///
/// After the scalar rules, a trailing `(s)` expands into the singular and
/// plural forms (`glove(s)` -> `glove`, `gloves`), each re-run through the
/// rules so expansion output is itself canonical.
pub fn canonicalize_gloss(raw: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    expand_plural(apply_rules(raw), &mut candidates, 0);
    candidates
}

fn expand_plural(text: String, out: &mut Vec<String>, depth: usize) {
    if depth < MAX_RULE_PASSES {
        if let Some(caps) = PLURAL_SUFFIX.captures(&text) {
            let singular = apply_rules(&caps[1]);
            let plural = apply_rules(&format!("{singular}s"));
            expand_plural(singular, out, depth + 1);
            expand_plural(plural, out, depth + 1);
            return;
        }
    }
    out.push(text);
}

/// Counters for the normalize stage, reconciling glosses in vs out.
#[derive(Serialize, Debug, Clone, Default)]
pub struct NormalizeStats {
    pub entries: usize,
    pub glosses_in: usize,
    pub glosses_out: usize,
    pub duplicates_removed: usize,
    pub empties_dropped: usize,
    pub special_overrides: usize,
}

/// Canonicalize every gloss in the collection.
///
/// Only `glosses` and `display_glosses` are touched; ids and all other
/// fields pass through unchanged.
pub fn normalize_dictionary(
    mut dictionary: Dictionary,
    config: &NormalizeConfig,
) -> (Dictionary, NormalizeStats) {
    let mut stats = NormalizeStats::default();

    for (id, entry) in dictionary.iter_mut() {
        stats.entries += 1;

        let special = config.special_glosses.get(id);
        let languages: BTreeSet<String> = entry
            .glosses
            .keys()
            .chain(entry.display_glosses.keys())
            .cloned()
            .collect();

        let mut new_glosses = BTreeMap::new();
        let mut new_display = BTreeMap::new();

        for lang in languages {
            if special.is_some() && lang == config.special_language {
                continue;
            }

            // The display list is the raw source when present; on a first
            // run only `glosses` exists and holds the raw merged strings.
            let raw_list = entry
                .display_glosses
                .get(&lang)
                .or_else(|| entry.glosses.get(&lang))
                .cloned()
                .unwrap_or_default();

            let (canonical, display) = normalize_gloss_list(&raw_list, &mut stats);
            if canonical.is_empty() {
                continue;
            }
            if display != canonical {
                new_display.insert(lang.clone(), display);
            }
            new_glosses.insert(lang, canonical);
        }

        if let Some(overrides) = special {
            new_glosses.insert(config.special_language.clone(), overrides.clone());
            stats.special_overrides += 1;
        }

        entry.glosses = new_glosses;
        entry.display_glosses = new_display;
    }

    info!(
        entries = stats.entries,
        glosses_in = stats.glosses_in,
        glosses_out = stats.glosses_out,
        duplicates_removed = stats.duplicates_removed,
        empties_dropped = stats.empties_dropped,
        special_overrides = stats.special_overrides,
        "normalize complete"
    );
    (dictionary, stats)
}

/// Canonicalize one language's gloss list: rules, plural expansion, then
/// dedup by canonical key with first-seen order and display form winning.
fn normalize_gloss_list(
    raw_list: &[String],
    stats: &mut NormalizeStats,
) -> (Vec<String>, Vec<String>) {
    let mut canonical = Vec::new();
    let mut display = Vec::new();
    let mut seen = BTreeSet::new();

    for raw in raw_list {
        stats.glosses_in += 1;
        for candidate in canonicalize_gloss(raw) {
            if candidate.is_empty() {
                stats.empties_dropped += 1;
                continue;
            }
            let key = canonical_key(&candidate);
            if !seen.insert(key.clone()) {
                stats.duplicates_removed += 1;
                continue;
            }
            display.push(candidate);
            canonical.push(key);
        }
    }

    stats.glosses_out += canonical.len();
    (canonical, display)
}
