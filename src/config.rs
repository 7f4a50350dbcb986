use std::collections::BTreeMap;

/// Grammar for splitting a gloss-table cell into candidate glosses.
///
/// The escape character removes any special meaning from the character that
/// follows it: `\;` is a literal delimiter, `\\` a literal backslash. A
/// trailing lone escape is kept as a literal character.
#[derive(Debug, Clone)]
pub struct CellRules {
    /// Separator between gloss candidates within one cell.
    pub delimiter: char,
    /// Escape character inside a cell.
    pub escape: char,
}

impl Default for CellRules {
    fn default() -> Self {
        Self {
            delimiter: ';',
            escape: '\\',
        }
    }
}

/// Configuration for the merge stage.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub cell_rules: CellRules,
    /// Marker on a gloss candidate flagging the whole entry as legacy.
    pub old_marker: String,
    /// One-time data patch: entry id -> corrected `pos_colour`, applied to
    /// the base collection before any row is merged.
    pub colour_corrections: BTreeMap<String, String>,
    /// `pos_colour` value -> part-of-speech tag for semantics derivation.
    pub pos_from_colour: BTreeMap<String, String>,
    /// Component id whose presence marks a concretization type shift.
    pub concretization_indicator: i64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            cell_rules: CellRules::default(),
            old_marker: "_(OLD)".to_string(),
            colour_corrections: BTreeMap::new(),
            pos_from_colour: BTreeMap::from([
                ("RED".to_string(), "verb".to_string()),
                ("YELLOW".to_string(), "noun".to_string()),
                ("BLUE".to_string(), "noun".to_string()),
            ]),
            concretization_indicator: 9009,
        }
    }
}

/// Configuration for the normalize stage.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Entry id -> fixed gloss list that replaces the canonicalized result
    /// for `special_language`. Punctuation and single-character symbols
    /// would not survive the rule pipeline.
    pub special_glosses: BTreeMap<String, Vec<String>>,
    /// Language the special gloss table applies to.
    pub special_language: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            special_glosses: default_special_glosses(),
            special_language: "en".to_string(),
        }
    }
}

/// Symbols whose English gloss is itself punctuation, a digit, or a letter.
const SPECIAL_GLOSSES: &[(&str, &[&str])] = &[
    ("8483", &["!"]),
    ("8484", &["%"]),
    ("8485", &["?"]),
    ("8486", &["."]),
    ("8487", &[","]),
    ("8488", &[":"]),
    ("8489", &["'"]),
    ("8490", &["degree"]),
    ("8496", &["0"]),
    ("8497", &["1"]),
    ("8498", &["2"]),
    ("8499", &["3"]),
    ("8500", &["4"]),
    ("8501", &["5"]),
    ("8502", &["6"]),
    ("8503", &["7"]),
    ("8504", &["8"]),
    ("8505", &["9"]),
    ("8521", &["a"]),
    ("8522", &["b"]),
    ("8523", &["c"]),
    ("8524", &["d"]),
    ("8525", &["e"]),
    ("8526", &["f"]),
    ("8527", &["g"]),
    ("8528", &["h"]),
    ("8529", &["i"]),
    ("8530", &["j"]),
    ("8531", &["k"]),
    ("8532", &["l"]),
    ("8533", &["m"]),
    ("8534", &["n"]),
    ("8535", &["o"]),
    ("8536", &["p"]),
    ("8537", &["q"]),
    ("8538", &["r"]),
    ("8539", &["s"]),
    ("8540", &["t"]),
    ("8541", &["u"]),
    ("8542", &["v"]),
    ("8543", &["w"]),
    ("8544", &["x"]),
    ("8545", &["y"]),
    ("8546", &["z"]),
    ("8551", &["A"]),
    ("8552", &["B"]),
    ("8553", &["C"]),
    ("8554", &["D"]),
    ("8555", &["E"]),
    ("8556", &["F"]),
    ("8557", &["G"]),
    ("8558", &["H"]),
    ("8559", &["I"]),
    ("8560", &["J"]),
    ("8561", &["K"]),
    ("8562", &["L"]),
    ("8563", &["M"]),
    ("8564", &["N"]),
    ("8565", &["O"]),
    ("8566", &["P"]),
    ("8567", &["Q"]),
    ("8568", &["R"]),
    ("8569", &["S"]),
    ("8570", &["T"]),
    ("8571", &["U"]),
    ("8572", &["V"]),
    ("8573", &["W"]),
    ("8574", &["X"]),
    ("8575", &["Y"]),
    ("8576", &["Z"]),
];

/// Build the default special-gloss table.
pub fn default_special_glosses() -> BTreeMap<String, Vec<String>> {
    SPECIAL_GLOSSES
        .iter()
        .map(|(id, glosses)| {
            (
                (*id).to_string(),
                glosses.iter().map(|g| (*g).to_string()).collect(),
            )
        })
        .collect()
}
