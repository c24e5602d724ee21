/*
 * namespace.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Namespace-set minimization.
 */

//! Namespace-set minimization.
//!
//! The emitted bundle must ensure every namespace object exists on the
//! client before assigning template functions into it. Creating a deep
//! namespace transitively creates its ancestors, so any namespace that
//! prefixes another in the set is redundant. Reducing the set up front
//! minimizes the existence checks the bundle performs at load time.

/// Remove every namespace that is an anchored prefix of another entry.
///
/// `['foo.bar', 'foo', 'foo.aaa', 'foo.bar.yoyo']` reduces to
/// `['foo.aaa', 'foo.bar.yoyo']`. Duplicates cover each other, so they
/// collapse to a single occurrence. Inputs of size <= 1 are returned
/// unchanged.
pub fn reduce_namespaces(mut namespaces: Vec<String>) -> Vec<String> {
    if namespaces.len() <= 1 {
        return namespaces;
    }
    // Fixed-point iteration: remove the covering (shorter) entry and
    // restart the scan until a full pass removes nothing.
    let mut i = 0;
    while i < namespaces.len() {
        let covers_another = namespaces
            .iter()
            .enumerate()
            .any(|(j, other)| i != j && other.starts_with(&namespaces[i]));
        if covers_another {
            namespaces.remove(i);
            i = 0;
        } else {
            i += 1;
        }
    }
    namespaces
}

/// Derive the namespace bootstrap list for a set of dotted view names.
///
/// Seeds with the root namespace, adds one entry per view that has
/// intermediate segments (the view's own leaf is excluded since the
/// assignment itself creates it), then reduces the set.
pub fn bootstrap_namespaces(root: &str, view_names: &[String]) -> Vec<String> {
    let mut namespaces = vec![root.to_string()];
    for name in view_names {
        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() == 1 {
            // Template in the root of the views dir
            continue;
        }
        let intermediate = &segments[..segments.len() - 1];
        namespaces.push(format!("{}.{}", root, intermediate.join(".")));
    }
    reduce_namespaces(namespaces)
}
