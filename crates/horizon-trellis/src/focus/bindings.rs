//! Key bindings for focus traversal.
//!
//! Bindings map each [`TraversalType`] to the key presses that trigger it.
//! They can be read from and written to TOML:
//!
//! ```toml
//! [traversal]
//! forward  = ["Tab"]
//! backward = ["Shift+Tab"]
//! upward   = ["Ctrl+Shift+Tab"]
//! downward = ["Ctrl+Tab"]
//! ```
//!
//! A missing table or entry keeps the default for that traversal type; an
//! empty list unbinds it.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use horizon_trellis_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::TraversalType;
use crate::error::{ConfigError, Result};
use crate::event::{Key, KeyState, KeyboardModifiers};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    traversal: Option<TraversalTable>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TraversalTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forward: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backward: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upward: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    downward: Option<Vec<String>>,
}

impl TraversalTable {
    fn entry(&self, traversal: TraversalType) -> Option<&Vec<String>> {
        match traversal {
            TraversalType::Forward => self.forward.as_ref(),
            TraversalType::Backward => self.backward.as_ref(),
            TraversalType::Upward => self.upward.as_ref(),
            TraversalType::Downward => self.downward.as_ref(),
        }
    }

    fn entry_mut(&mut self, traversal: TraversalType) -> &mut Option<Vec<String>> {
        match traversal {
            TraversalType::Forward => &mut self.forward,
            TraversalType::Backward => &mut self.backward,
            TraversalType::Upward => &mut self.upward,
            TraversalType::Downward => &mut self.downward,
        }
    }
}

/// Key presses that trigger each traversal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalKeys {
    keys: HashMap<TraversalType, HashSet<KeyState>>,
}

impl Default for TraversalKeys {
    /// Tab moves forward, Shift+Tab backward; upward and downward are unbound.
    fn default() -> Self {
        let mut keys = HashMap::new();
        keys.insert(
            TraversalType::Forward,
            HashSet::from([KeyState::key_only(Key::Tab)]),
        );
        keys.insert(
            TraversalType::Backward,
            HashSet::from([KeyState::pressed(Key::Tab, KeyboardModifiers::SHIFT)]),
        );
        Self { keys }
    }
}

impl TraversalKeys {
    /// Bindings with nothing bound.
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Keys bound to `traversal`, if any.
    pub fn get(&self, traversal: TraversalType) -> Option<&HashSet<KeyState>> {
        self.keys.get(&traversal).filter(|keys| !keys.is_empty())
    }

    /// Replaces the keys bound to `traversal`.
    pub fn set(&mut self, traversal: TraversalType, keys: impl IntoIterator<Item = KeyState>) {
        let keys: HashSet<KeyState> = keys.into_iter().collect();
        if keys.is_empty() {
            self.keys.remove(&traversal);
        } else {
            self.keys.insert(traversal, keys);
        }
    }

    /// Removes every key bound to `traversal`.
    pub fn unbind(&mut self, traversal: TraversalType) {
        self.keys.remove(&traversal);
    }

    /// Returns true if `state` triggers `traversal`.
    pub fn matches(&self, traversal: TraversalType, state: &KeyState) -> bool {
        self.keys
            .get(&traversal)
            .is_some_and(|keys| keys.contains(state))
    }

    // =========================================================================
    // TOML
    // =========================================================================

    /// Parses bindings from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: BindingsFile = toml::from_str(text)?;
        let mut bindings = Self::default();

        let Some(table) = file.traversal else {
            tracing::debug!(target: targets::CONFIG, "no [traversal] table, using defaults");
            return Ok(bindings);
        };

        for traversal in TraversalType::ALL {
            let Some(entries) = table.entry(traversal) else {
                continue;
            };
            let keys = entries
                .iter()
                .map(|entry| entry.parse::<KeyState>())
                .collect::<Result<HashSet<_>>>()?;
            bindings.set(traversal, keys);
        }

        bindings.warn_conflicts();
        Ok(bindings)
    }

    /// Reads bindings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let bindings = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded traversal keys");
        Ok(bindings)
    }

    /// Writes every traversal type, unbound ones as empty lists.
    pub fn to_toml_string(&self) -> Result<String> {
        let mut table = TraversalTable::default();
        for traversal in TraversalType::ALL {
            let mut entries: Vec<String> = self
                .keys
                .get(&traversal)
                .into_iter()
                .flatten()
                .map(ToString::to_string)
                .collect();
            entries.sort();
            *table.entry_mut(traversal) = Some(entries);
        }
        let file = BindingsFile {
            traversal: Some(table),
        };
        Ok(toml::to_string(&file)?)
    }

    fn warn_conflicts(&self) {
        for (i, first) in TraversalType::ALL.iter().enumerate() {
            for second in &TraversalType::ALL[i + 1..] {
                let (Some(a), Some(b)) = (self.keys.get(first), self.keys.get(second)) else {
                    continue;
                };
                for state in a.intersection(b) {
                    tracing::warn!(
                        target: targets::CONFIG,
                        key = %state,
                        first = %first,
                        second = %second,
                        "key bound to two traversal types"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn press(text: &str) -> KeyState {
        text.parse().unwrap()
    }

    #[test]
    fn test_defaults() {
        let keys = TraversalKeys::default();
        assert!(keys.matches(TraversalType::Forward, &press("Tab")));
        assert!(keys.matches(TraversalType::Backward, &press("Shift+Tab")));
        assert!(!keys.matches(TraversalType::Forward, &press("Shift+Tab")));
        assert!(keys.get(TraversalType::Upward).is_none());
        assert!(keys.get(TraversalType::Downward).is_none());
    }

    #[test]
    fn test_from_toml_overrides_listed_entries() {
        let keys = TraversalKeys::from_toml_str(
            r#"
            [traversal]
            forward = ["Tab", "Ctrl+Right"]
            downward = ["Ctrl+Tab"]
            "#,
        )
        .unwrap();

        assert!(keys.matches(TraversalType::Forward, &press("Ctrl+Right")));
        assert!(keys.matches(TraversalType::Forward, &press("Tab")));
        assert!(keys.matches(TraversalType::Backward, &press("Shift+Tab")));
        assert!(keys.matches(TraversalType::Downward, &press("Ctrl+Tab")));
        assert!(keys.get(TraversalType::Upward).is_none());
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let keys = TraversalKeys::from_toml_str("").unwrap();
        assert_eq!(keys, TraversalKeys::default());
    }

    #[test]
    fn test_empty_list_unbinds() {
        let keys = TraversalKeys::from_toml_str("[traversal]\nbackward = []").unwrap();
        assert!(keys.get(TraversalType::Backward).is_none());
        assert!(keys.get(TraversalType::Forward).is_some());
    }

    #[test]
    fn test_from_toml_errors() {
        let unknown = TraversalKeys::from_toml_str("[traversal]\nforward = [\"Hyper+Tab\"]");
        assert!(matches!(unknown, Err(ConfigError::UnknownKey(name)) if name == "Hyper"));

        let two_keys = TraversalKeys::from_toml_str("[traversal]\nforward = [\"A+Tab\"]");
        assert!(matches!(two_keys, Err(ConfigError::UnknownModifier(name)) if name == "A"));

        let bad_shape = TraversalKeys::from_toml_str("[traversal]\nforward = \"Tab\"");
        assert!(matches!(bad_shape, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut keys = TraversalKeys::default();
        keys.set(TraversalType::Upward, [press("Ctrl+Shift+Tab")]);

        let text = keys.to_toml_string().unwrap();
        assert!(text.contains("[traversal]"));
        assert!(text.contains("downward = []"));

        assert_eq!(TraversalKeys::from_toml_str(&text).unwrap(), keys);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[traversal]\nupward = [\"Escape\"]").unwrap();

        let keys = TraversalKeys::load(file.path()).unwrap();
        assert!(keys.matches(TraversalType::Upward, &press("Escape")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TraversalKeys::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
