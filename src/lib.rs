pub mod config;
pub mod duplicates;
pub mod gloss_table;
pub mod merge;
pub mod model;
pub mod normalize;

// Re-export main types for convenient access
pub use config::{CellRules, MergeConfig, NormalizeConfig};
pub use duplicates::{find_duplicates, DuplicateGroup, GroupMember};
pub use merge::merge_dictionary;
pub use model::{read_dictionary, write_dictionary, Dictionary, SymbolEntry};
pub use normalize::{apply_rules, canonical_key, normalize_dictionary};
