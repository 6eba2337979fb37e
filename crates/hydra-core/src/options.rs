//! Engine configuration snapshot and the store that merges attribute updates
//! into it.
//!
//! The snapshot always carries every key. Updates arrive as an
//! [`OptionsPatch`] and are merged shallowly: keys the patch leaves unset keep
//! their current value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Float precision used when compiling the engine's shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Highp,
    Mediump,
    Lowp,
}

impl Precision {
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Highp => "highp",
            Precision::Mediump => "mediump",
            Precision::Lowp => "lowp",
        }
    }

    /// Look up a precision by its exact shader keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "highp" => Some(Precision::Highp),
            "mediump" => Some(Precision::Mediump),
            "lowp" => Some(Precision::Lowp),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full set of engine construction parameters.
///
/// Field names serialize to the keys the engine constructor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    pub detect_audio: bool,
    pub num_sources: u32,
    pub num_outputs: u32,
    pub precision: Precision,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            detect_audio: false,
            num_sources: 4,
            num_outputs: 4,
            precision: Precision::Highp,
        }
    }
}

/// A partial update. Unset fields leave the stored value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sources: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outputs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,
}

impl OptionsPatch {
    pub fn detect_audio(value: bool) -> Self {
        Self {
            detect_audio: Some(value),
            ..Self::default()
        }
    }

    pub fn num_sources(value: u32) -> Self {
        Self {
            num_sources: Some(value),
            ..Self::default()
        }
    }

    pub fn num_outputs(value: u32) -> Self {
        Self {
            num_outputs: Some(value),
            ..Self::default()
        }
    }

    pub fn precision(value: Precision) -> Self {
        Self {
            precision: Some(value),
            ..Self::default()
        }
    }

    /// Parse a JSON object of engine option keys, e.g. `{"numOutputs":2}`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns the current configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct OptionsStore {
    current: EngineOptions,
}

impl OptionsStore {
    /// Create a store populated from `defaults`.
    pub fn new(defaults: EngineOptions) -> Self {
        let mut store = Self::default();
        store.initialize(defaults);
        store
    }

    /// Reset every key from `defaults`.
    pub fn initialize(&mut self, defaults: EngineOptions) {
        self.current = defaults;
    }

    /// Shallow-merge `patch` and return the resulting snapshot.
    pub fn merge(&mut self, patch: OptionsPatch) -> EngineOptions {
        let OptionsPatch {
            detect_audio,
            num_sources,
            num_outputs,
            precision,
        } = patch;
        if let Some(v) = detect_audio {
            self.current.detect_audio = v;
        }
        if let Some(v) = num_sources {
            self.current.num_sources = v;
        }
        if let Some(v) = num_outputs {
            self.current.num_outputs = v;
        }
        if let Some(v) = precision {
            self.current.precision = v;
        }
        self.current
    }

    pub fn snapshot(&self) -> EngineOptions {
        self.current
    }

    /// Current snapshot as a JSON object using the engine's key names.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.current).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_engine_defaults() {
        let store = OptionsStore::new(EngineOptions::default());
        assert_eq!(
            store.snapshot(),
            EngineOptions {
                detect_audio: false,
                num_sources: 4,
                num_outputs: 4,
                precision: Precision::Highp,
            }
        );
    }

    #[test]
    fn merge_is_shallow() {
        let mut store = OptionsStore::new(EngineOptions::default());
        store.merge(OptionsPatch::detect_audio(true));
        let snap = store.merge(OptionsPatch::num_outputs(2));
        assert_eq!(
            snap,
            EngineOptions {
                detect_audio: true,
                num_sources: 4,
                num_outputs: 2,
                precision: Precision::Highp,
            }
        );
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut store = OptionsStore::new(EngineOptions {
            precision: Precision::Lowp,
            ..EngineOptions::default()
        });
        let before = store.snapshot();
        assert!(OptionsPatch::default().is_empty());
        assert_eq!(store.merge(OptionsPatch::default()), before);
    }

    #[test]
    fn initialize_overwrites_every_key() {
        let mut store = OptionsStore::new(EngineOptions::default());
        store.merge(OptionsPatch::num_sources(9));
        store.initialize(EngineOptions::default());
        assert_eq!(store.snapshot().num_sources, 4);
    }

    #[test]
    fn json_uses_engine_key_names() {
        let store = OptionsStore::new(EngineOptions::default());
        assert_eq!(
            store.to_json(),
            r#"{"detectAudio":false,"numSources":4,"numOutputs":4,"precision":"highp"}"#
        );
    }

    #[test]
    fn patch_from_json() {
        let patch = OptionsPatch::from_json(r#"{"numOutputs":2,"precision":"mediump"}"#).unwrap();
        assert_eq!(
            patch,
            OptionsPatch {
                num_outputs: Some(2),
                precision: Some(Precision::Mediump),
                ..OptionsPatch::default()
            }
        );
    }

    #[test]
    fn patch_rejects_unknown_keys() {
        assert!(OptionsPatch::from_json(r#"{"canvas":1}"#).is_err());
        assert!(OptionsPatch::from_json(r#"{"precision":"ultra"}"#).is_err());
    }
}
