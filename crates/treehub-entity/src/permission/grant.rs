//! The per-folder grant sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::level::{AccessLevel, Role};

/// Three sets of usernames, one per [`AccessLevel`].
///
/// The sets are pairwise disjoint: every mutation goes through
/// [`GrantSets::assign`] or [`GrantSets::remove`], which treat the triple
/// as a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSets {
    /// Users holding `read`.
    #[serde(default)]
    read: BTreeSet<String>,
    /// Users holding `write`.
    #[serde(default)]
    write: BTreeSet<String>,
    /// Users holding `readWrite`.
    #[serde(default, rename = "readWrite")]
    read_write: BTreeSet<String>,
}

impl GrantSets {
    /// Rebuild the sets from stored columns.
    ///
    /// Rows that were written around the engine may hold a user in more
    /// than one column; such rows are kept as-is so that [`Self::role_of`]
    /// can still report with `read` precedence.
    pub fn from_columns(read: Vec<String>, write: Vec<String>, read_write: Vec<String>) -> Self {
        Self {
            read: read.into_iter().collect(),
            write: write.into_iter().collect(),
            read_write: read_write.into_iter().collect(),
        }
    }

    /// The set for a level.
    pub fn members(&self, level: AccessLevel) -> &BTreeSet<String> {
        match level {
            AccessLevel::Read => &self.read,
            AccessLevel::Write => &self.write,
            AccessLevel::ReadWrite => &self.read_write,
        }
    }

    /// Sorted usernames for a level, as stored in a column.
    pub fn column(&self, level: AccessLevel) -> Vec<String> {
        self.members(level).iter().cloned().collect()
    }

    /// Give `username` exactly `level`, dropping any other level first.
    ///
    /// Returns whether anything changed.
    pub fn assign(&mut self, username: &str, level: AccessLevel) -> bool {
        let mut changed = false;
        for other in AccessLevel::ALL {
            if other != level {
                changed |= self.set_mut(other).remove(username);
            }
        }
        changed |= self.set_mut(level).insert(username.to_string());
        changed
    }

    /// Drop `username` from every set. Returns whether it held any grant.
    pub fn remove(&mut self, username: &str) -> bool {
        let mut changed = false;
        for level in AccessLevel::ALL {
            changed |= self.set_mut(level).remove(username);
        }
        changed
    }

    /// The role `username` holds. `read` wins if the sets overlap.
    pub fn role_of(&self, username: &str) -> Role {
        AccessLevel::ALL
            .into_iter()
            .find(|level| self.members(*level).contains(username))
            .map(Role::from)
            .unwrap_or(Role::None)
    }

    /// Every grantee with its role, read first, then write, then readWrite.
    pub fn grantees(&self) -> Vec<(String, Role)> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for level in AccessLevel::ALL {
            for user in self.members(level) {
                if seen.insert(user.as_str()) {
                    out.push((user.clone(), Role::from(level)));
                }
            }
        }
        out
    }

    /// Whether no user appears in two sets.
    pub fn is_disjoint(&self) -> bool {
        self.read.is_disjoint(&self.write)
            && self.read.is_disjoint(&self.read_write)
            && self.write.is_disjoint(&self.read_write)
    }

    /// Whether all three sets are empty.
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty() && self.read_write.is_empty()
    }

    fn set_mut(&mut self, level: AccessLevel) -> &mut BTreeSet<String> {
        match level {
            AccessLevel::Read => &mut self.read,
            AccessLevel::Write => &mut self.write,
            AccessLevel::ReadWrite => &mut self.read_write,
        }
    }
}
