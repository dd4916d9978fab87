//! Recursive dotted-path configuration container.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GenError};
use crate::value::{Entry, Scalar};

/// Hierarchical key/value container addressed by dotted paths.
///
/// The root node (level 0) only ever holds nested nodes; leaves live at
/// level 1 and below. Writes auto-create intermediate nodes along the
/// path; reads never mutate the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigTree {
    pub(crate) level: usize,
    pub(crate) entries: BTreeMap<String, Entry>,
}

impl ConfigTree {
    /// Creates an empty root tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn nested(level: usize) -> Self {
        Self {
            level,
            entries: BTreeMap::new(),
        }
    }

    /// Number of keys held directly by this node.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when this node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assigns a leaf at `path`, creating intermediate nodes as needed.
    ///
    /// Fails with [`GenError::Structure`] when the path resolves to the
    /// root itself (the root holds only nested nodes) or when an
    /// intermediate segment already holds a leaf.
    pub fn set(&mut self, path: &str, value: impl Into<Scalar>) -> Result<(), GenError> {
        self.set_scalar(path, value.into())
    }

    fn set_scalar(&mut self, path: &str, value: Scalar) -> Result<(), GenError> {
        match path.split_once('.') {
            Some((head, rest)) => self.child_node(head)?.set_scalar(rest, value),
            None => {
                if self.level == 0 {
                    return Err(GenError::Structure(
                        ErrorInfo::new("root-leaf", "the root node cannot hold a leaf directly")
                            .with_context("key", path)
                            .with_hint("address the leaf through a nested scope, e.g. `cache.<key>`"),
                    ));
                }
                self.entries.insert(path.to_string(), Entry::Leaf(value));
                Ok(())
            }
        }
    }

    /// Returns the nested node for `key`, creating it when absent.
    fn child_node(&mut self, key: &str) -> Result<&mut ConfigTree, GenError> {
        let level = self.level + 1;
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Node(ConfigTree::nested(level)));
        match entry {
            Entry::Node(node) => Ok(node),
            Entry::Leaf(_) => Err(GenError::Structure(
                ErrorInfo::new("leaf-descent", "path segment already holds a leaf")
                    .with_context("key", key),
            )),
        }
    }

    /// Looks up the entry at `path` without mutating the tree.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        match path.split_once('.') {
            Some((head, rest)) => match self.entries.get(head)? {
                Entry::Node(node) => node.get(rest),
                Entry::Leaf(_) => None,
            },
            None => self.entries.get(path),
        }
    }

    /// Looks up a leaf scalar at `path`.
    pub fn scalar(&self, path: &str) -> Option<&Scalar> {
        self.get(path).and_then(Entry::as_leaf)
    }

    /// True when `path` resolves to an entry. Never mutates the tree.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Removes the entry at `path`.
    ///
    /// Fails with [`GenError::Missing`] when any segment is absent and
    /// with [`GenError::Structure`] when the path would remove a whole
    /// top-level scope from the root through a single segment.
    pub fn delete(&mut self, path: &str) -> Result<(), GenError> {
        match path.split_once('.') {
            Some((head, rest)) => match self.entries.get_mut(head) {
                Some(Entry::Node(node)) => node.delete(rest),
                Some(Entry::Leaf(_)) => Err(GenError::Missing(
                    ErrorInfo::new("leaf-segment", "path segment holds a leaf, not a scope")
                        .with_context("key", head),
                )),
                None => Err(GenError::Missing(
                    ErrorInfo::new("absent-segment", "path segment not present")
                        .with_context("key", head),
                )),
            },
            None => {
                if self.level == 0 {
                    return Err(GenError::Structure(
                        ErrorInfo::new("root-delete", "top-level scopes cannot be deleted directly")
                            .with_context("key", path),
                    ));
                }
                match self.entries.remove(path) {
                    Some(_) => Ok(()),
                    None => Err(GenError::Missing(
                        ErrorInfo::new("absent-key", "key not present").with_context("key", path),
                    )),
                }
            }
        }
    }

    /// Computes the recursive structural difference against `other`.
    pub fn diff(&self, other: &ConfigTree) -> TreeDiff {
        let mut diff = TreeDiff::default();
        self.diff_into(other, "", &mut diff);
        diff
    }

    fn diff_into(&self, other: &ConfigTree, prefix: &str, out: &mut TreeDiff) {
        for key in self.entries.keys() {
            if !other.entries.contains_key(key) {
                out.presence.insert(join(prefix, key));
            }
        }
        for key in other.entries.keys() {
            if !self.entries.contains_key(key) {
                out.presence.insert(join(prefix, key));
            }
        }
        for (key, mine) in &self.entries {
            let Some(theirs) = other.entries.get(key) else {
                continue;
            };
            match (mine, theirs) {
                (Entry::Node(a), Entry::Node(b)) => a.diff_into(b, &join(prefix, key), out),
                (Entry::Leaf(a), Entry::Leaf(b)) => {
                    if a != b {
                        out.values.insert(join(prefix, key));
                    }
                }
                // Node on one side, leaf on the other.
                _ => {
                    out.values.insert(join(prefix, key));
                }
            }
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Result of [`ConfigTree::diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDiff {
    /// Dotted keys present on exactly one side.
    pub presence: BTreeSet<String>,
    /// Dotted keys present on both sides with differing leaves.
    pub values: BTreeSet<String>,
}

impl TreeDiff {
    /// True when the two trees are structurally identical.
    pub fn is_empty(&self) -> bool {
        self.presence.is_empty() && self.values.is_empty()
    }
}
