use serde::{Deserialize, Serialize};
use tracing::debug;

use linearize_diff::diff_with;
use linearize_merge::merge_with;
use linearize_object::{linearize, unlinearize, Schema};
use linearize_types::{MaskSummary, Record, UpdateMask};

use crate::config::EngineConfig;
use crate::error::SdkResult;

/// The change between two record snapshots, ready to apply or revert.
///
/// `after` carries the values `apply` writes and `before` the values `revert`
/// restores. Both only need to hold the masked slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub before: Record,
    pub after: Record,
    pub mask: UpdateMask,
}

impl Patch {
    /// Diff two snapshots with the default configuration.
    pub fn between(previous: &Record, latest: &Record) -> SdkResult<Self> {
        Self::between_with(&EngineConfig::default(), previous, latest)
    }

    pub fn between_with(config: &EngineConfig, previous: &Record, latest: &Record) -> SdkResult<Self> {
        let d = diff_with(&config.diff, previous, latest)?;
        Ok(Self {
            before: d.before,
            after: d.after,
            mask: d.mask.unwrap_or_default(),
        })
    }

    /// Diff two objects; an absent object is the empty record.
    pub fn between_objects<T: Schema>(previous: Option<&T>, latest: Option<&T>) -> SdkResult<Self> {
        let previous = linearize(previous)?;
        let latest = linearize(latest)?;
        Self::between(&previous, &latest)
    }

    /// `true` when the snapshots were identical.
    pub fn is_noop(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn summary(&self) -> MaskSummary {
        self.mask.summary()
    }

    /// Apply the patch to a copy of `current`.
    pub fn apply(&self, current: &Record) -> SdkResult<Record> {
        self.apply_with(&EngineConfig::default(), current)
    }

    pub fn apply_with(&self, config: &EngineConfig, current: &Record) -> SdkResult<Record> {
        if self.is_noop() {
            return Ok(current.clone());
        }
        Ok(merge_with(&config.merge, &self.mask, current, &self.after)?)
    }

    /// Linearize `current`, apply the patch and rebuild the object.
    pub fn apply_to_object<T: Schema>(&self, current: &T) -> SdkResult<T> {
        self.apply_to_object_with(&EngineConfig::default(), current)
    }

    pub fn apply_to_object_with<T: Schema>(&self, config: &EngineConfig, current: &T) -> SdkResult<T> {
        let record = self.apply_with(config, &linearize(Some(current))?)?;
        Ok(unlinearize(&record)?)
    }

    /// Undo the patch on a record that has it applied.
    pub fn revert(&self, latest: &Record) -> SdkResult<Record> {
        self.revert_with(&EngineConfig::default(), latest)
    }

    pub fn revert_with(&self, config: &EngineConfig, latest: &Record) -> SdkResult<Record> {
        if self.is_noop() {
            return Ok(latest.clone());
        }
        let inverse = self.mask.inverse();
        debug!(fields = inverse.len(), "reverting patch");
        Ok(merge_with(&config.merge, &inverse, latest, &self.before)?)
    }

    /// The patch that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            before: self.after.clone(),
            after: self.before.clone(),
            mask: self.mask.inverse(),
        }
    }

    pub fn to_json(&self) -> SdkResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
