//! State comparison used to decide whether an update call is needed.
//!
//! # Asymmetry
//!
//! [`compare`] only walks the fields of the **desired** tree. A field that
//! exists in the current tree but not in the desired one is never reported.
//! The remote returns many server-computed fields the caller does not manage
//! (timestamps, nested outpost data, computed config), and an update must not
//! be triggered just because those exist.
//!
//! The symmetric view, including removed fields, is [`crate::diff`], which is
//! only used for the operator-facing log. Do not "fix" one to match the other.

use connector_sync_types::{ConfigTree, ConfigValue};
use std::collections::BTreeSet;

/// Field names skipped during comparison, at every nesting level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    /// Fields the remote computes on its own: identifier, status, last
    /// activity, outpost reference, type reference and computed config.
    pub const STANDARD: [&'static str; 6] =
        ["id", "status", "lastActivity", "outpost", "type", "config"];

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        Self::STANDARD.into_iter().collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { names: iter.into_iter().map(Into::into).collect() }
    }
}

/// Outcome of [`compare`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Dot-joined paths of desired fields that differ, in desired order.
    pub changed_paths: Vec<String>,
}

impl Comparison {
    pub fn is_equivalent(&self) -> bool {
        self.changed_paths.is_empty()
    }
}

/// Compare `desired` against `current`, skipping names in `ignore`.
///
/// Rules per desired field:
/// - missing from `current`: changed
/// - both mappings: recurse, nested paths reported as `outer.inner`
/// - both strings that each parse as JSON: compared as parsed documents,
///   so key order and whitespace do not matter
/// - anything else: structural equality
pub fn compare(current: &ConfigTree, desired: &ConfigTree, ignore: &IgnoreSet) -> Comparison {
    let mut changed_paths = Vec::new();
    collect_changes(current, desired, ignore, None, &mut changed_paths);
    Comparison { changed_paths }
}

fn collect_changes(
    current: &ConfigTree,
    desired: &ConfigTree,
    ignore: &IgnoreSet,
    prefix: Option<&str>,
    out: &mut Vec<String>,
) {
    for (key, want) in desired {
        if ignore.contains(key) {
            continue;
        }

        let path = match prefix {
            Some(parent) => format!("{}.{}", parent, key),
            None => key.clone(),
        };

        let Some(have) = current.get(key) else {
            out.push(path);
            continue;
        };

        match (have, want) {
            (ConfigValue::Mapping(have), ConfigValue::Mapping(want)) => {
                collect_changes(have, want, ignore, Some(&path), out);
            },
            (ConfigValue::Text(_), ConfigValue::Text(_)) => {
                if !texts_equivalent(have, want) {
                    out.push(path);
                }
            },
            _ => {
                if have != want {
                    out.push(path);
                }
            },
        }
    }
}

/// Strings holding JSON compare by parsed content; otherwise by raw text.
fn texts_equivalent(have: &ConfigValue, want: &ConfigValue) -> bool {
    match (have.embedded_json(), want.embedded_json()) {
        (Some(have_doc), Some(want_doc)) => {
            have_doc.to_canonical_json() == want_doc.to_canonical_json()
        },
        _ => have == want,
    }
}
