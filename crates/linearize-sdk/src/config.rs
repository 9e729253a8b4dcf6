use serde::{Deserialize, Serialize};

use linearize_diff::{DiffConfig, ShapePolicy};
use linearize_merge::MergeConfig;

use crate::error::SdkResult;

/// Configuration for both engines, loadable from TOML.
///
/// ```toml
/// [diff]
/// shape_policy = "reject"
/// max_depth = 64
///
/// [merge]
/// max_depth = 64
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub diff: DiffConfig,
    pub merge: MergeConfig,
}

impl EngineConfig {
    /// Reject shape changes and keep default depth bounds.
    pub fn strict() -> Self {
        Self {
            diff: DiffConfig::strict(),
            ..Default::default()
        }
    }

    /// Apply one depth bound to both engines.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.diff.max_depth = max_depth;
        self.merge.max_depth = max_depth;
        self
    }

    pub fn shape_policy(&self) -> ShapePolicy {
        self.diff.shape_policy
    }

    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use linearize_types::DEFAULT_MAX_DEPTH;

    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let c = EngineConfig::from_toml_str("[diff]\nshape_policy = \"reject\"\n").unwrap();
        assert_eq!(c.shape_policy(), ShapePolicy::Reject);
        assert_eq!(c.diff.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(c.merge, MergeConfig::default());
    }

    #[test]
    fn toml_round_trip() {
        let c = EngineConfig::strict().with_max_depth(16);
        let text = c.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = EngineConfig::from_toml_str("[diff]\nshape_policy = \"coerce\"\n").unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
