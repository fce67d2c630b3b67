//! Pipeline configuration.
//!
//! Mirrors the shape `swc`'s own `react_jsx` transform uses for its
//! `Options` struct (`pragma` / `pragma_frag` / ... each with a
//! `#[serde(default = "...")]`), so a host can deserialize these from a
//! JSON/TOML config blob instead of constructing them by hand.

use serde::{Deserialize, Serialize};

fn default_pragma() -> String {
    "React.createElement".to_string()
}

fn default_pragma_frag() -> String {
    "React.Fragment".to_string()
}

fn default_add_use_strict() -> bool {
    true
}

fn default_max_recursive_calls() -> usize {
    1000
}

/// Configuration recognized by the pipeline. Per-source `// @jsx` and
/// `// @jsxFrag` hints override [`CompileOptions::pragma`] and
/// [`CompileOptions::pragma_frag`] for a single `compile` call; they never
/// mutate this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    #[serde(default = "default_pragma")]
    pub pragma: String,
    #[serde(default = "default_pragma_frag")]
    pub pragma_frag: String,
    #[serde(default = "default_add_use_strict")]
    pub add_use_strict: bool,
    #[serde(default = "default_max_recursive_calls")]
    pub max_recursive_calls: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pragma: default_pragma(),
            pragma_frag: default_pragma_frag(),
            add_use_strict: default_add_use_strict(),
            max_recursive_calls: default_max_recursive_calls(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let opts = CompileOptions::default();
        assert_eq!(opts.pragma, "React.createElement");
        assert_eq!(opts.pragma_frag, "React.Fragment");
        assert!(opts.add_use_strict);
        assert_eq!(opts.max_recursive_calls, 1000);
    }

    #[test]
    fn deserializes_partial_overrides() {
        let opts: CompileOptions = serde_json::from_str(r#"{"pragma": "h"}"#).unwrap();
        assert_eq!(opts.pragma, "h");
        assert_eq!(opts.pragma_frag, "React.Fragment");
    }
}
