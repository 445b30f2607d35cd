// src/watch/roots.rs

//! Reduce a set of paths to their minimal set of common roots.
//!
//! Not used by the poll loop; it backs the `--dry-run` report, where a
//! WatchSet of thousands of files is summarised by the handful of
//! directories it lives under.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<OsString, TrieNode>,
}

/// Collapse `paths` into the minimal set of prefixes such that every input
/// is equal to or below exactly one output, and no output is below another.
///
/// Paths are compared per component, so `/a/b` and `/a/bc` stay separate.
/// Empty paths are ignored.
pub fn find_common_roots<I, P>(paths: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut parts: Vec<Vec<OsString>> = paths
        .into_iter()
        .map(|p| {
            p.as_ref()
                .components()
                .map(|c| c.as_os_str().to_os_string())
                .collect::<Vec<_>>()
        })
        .filter(|chunks| !chunks.is_empty())
        .collect();

    // Longest first: a shorter path inserted later swallows the deeper
    // branches below it.
    parts.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut root = TrieNode::default();
    for chunks in parts {
        let mut node = &mut root;
        for chunk in chunks {
            node = node.children.entry(chunk).or_default();
        }
        node.children.clear();
    }

    let mut roots = BTreeSet::new();
    let mut prefix = PathBuf::new();
    collect_leaves(&root, &mut prefix, &mut roots);
    roots
}

fn collect_leaves(node: &TrieNode, prefix: &mut PathBuf, out: &mut BTreeSet<PathBuf>) {
    if node.children.is_empty() {
        if !prefix.as_os_str().is_empty() {
            out.insert(prefix.clone());
        }
        return;
    }

    for (chunk, child) in &node.children {
        let saved = prefix.clone();
        prefix.push(chunk);
        collect_leaves(child, prefix, out);
        *prefix = saved;
    }
}
