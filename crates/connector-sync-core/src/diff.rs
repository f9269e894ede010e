//! Operator-facing change report between two config trees.
//!
//! Unlike [`crate::compare`], this is symmetric and ignores nothing: every
//! top-level field added, changed or removed shows up. It is only logged.

use connector_sync_types::{ConfigTree, ConfigValue};
use serde::Serialize;
use std::fmt;

/// One line of a [`ConfigDiff`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DiffEntry {
    /// Present in desired, absent from current
    Added { key: String, value: ConfigValue },
    /// Present in both with different values
    Changed { key: String, old: ConfigValue, new: ConfigValue },
    /// Present in current, absent from desired
    Removed { key: String, value: ConfigValue },
}

impl DiffEntry {
    pub fn key(&self) -> &str {
        match self {
            Self::Added { key, .. } | Self::Changed { key, .. } | Self::Removed { key, .. } => key,
        }
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { key, value } => write!(f, "+ {}: {} (added)", key, value),
            Self::Changed { key, old, new } => write!(f, "~ {}: {} -> {}", key, old, new),
            Self::Removed { key, value } => write!(f, "- {}: {} (removed)", key, value),
        }
    }
}

/// Added/changed entries in desired order, then removed entries in current
/// order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ConfigDiff {
    pub entries: Vec<DiffEntry>,
}

impl ConfigDiff {
    pub fn compute(current: &ConfigTree, desired: &ConfigTree) -> Self {
        let mut entries = Vec::new();

        for (key, want) in desired {
            match current.get(key) {
                None => entries.push(DiffEntry::Added { key: key.clone(), value: want.clone() }),
                Some(have) if have != want => entries.push(DiffEntry::Changed {
                    key: key.clone(),
                    old: have.clone(),
                    new: want.clone(),
                }),
                Some(_) => {},
            }
        }

        for (key, have) in current {
            if !desired.contains_key(key) {
                entries.push(DiffEntry::Removed { key: key.clone(), value: have.clone() });
            }
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn added(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|e| matches!(e, DiffEntry::Added { .. }))
    }

    pub fn changed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|e| matches!(e, DiffEntry::Changed { .. }))
    }

    pub fn removed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|e| matches!(e, DiffEntry::Removed { .. }))
    }
}

impl fmt::Display for ConfigDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Changes:")?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Render the full diff as text.
pub fn format_diff(current: &ConfigTree, desired: &ConfigTree) -> String {
    ConfigDiff::compute(current, desired).to_string()
}
