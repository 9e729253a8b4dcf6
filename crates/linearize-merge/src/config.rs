use serde::{Deserialize, Serialize};

use linearize_types::DEFAULT_MAX_DEPTH;

/// Configuration for the merge engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum mask nesting depth below the root record.
    pub max_depth: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(MergeConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let c: MergeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, MergeConfig::default());
    }
}
