use serde::{Deserialize, Serialize};

use linearize_types::DEFAULT_MAX_DEPTH;

/// What the diff does when both snapshots hold a value at the same slot but
/// the values have different shapes (e.g. a record replaced by a scalar).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    /// Record a full-value `UPDATE` with no nested mask.
    #[default]
    Replace,
    /// Fail with [`DiffError::ShapeMismatch`](crate::DiffError::ShapeMismatch).
    Reject,
}

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Policy for slots whose shape changed between snapshots.
    pub shape_policy: ShapePolicy,
    /// Maximum nesting depth below the root record.
    pub max_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            shape_policy: ShapePolicy::Replace,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DiffConfig {
    /// Treat every shape change as an incompatible snapshot pair.
    pub fn strict() -> Self {
        Self {
            shape_policy: ShapePolicy::Reject,
            ..Default::default()
        }
    }
}
