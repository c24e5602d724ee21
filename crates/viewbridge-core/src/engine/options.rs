/*
 * engine/options.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-run compile options.
 */

//! Per-run compile options.
//!
//! Options are a JSON object handed to the client-side compile call.
//! Each engine declares defaults and a (possibly empty) pinned subset
//! that must survive any caller override. Merging produces a fresh
//! value for the run; engine state is never mutated.

use serde_json::{Map, Value};

/// A JSON object of compiler options.
///
/// Keys serialize in sorted order, so a given option set always
/// produces the same JS object literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOptions(Map<String, Value>);

impl CompileOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a single option, replacing any existing value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Overlay caller-supplied overrides onto this set.
    pub fn merge(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Re-assert pinned options after a merge. Pinned entries always
    /// win over caller overrides.
    pub fn pin(&mut self, pinned: &CompileOptions) {
        for (key, value) in &pinned.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Look up an option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as a JS object literal for the emitted compile call.
    pub fn to_js_object(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
