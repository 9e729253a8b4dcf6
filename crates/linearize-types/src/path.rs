use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldId;
use crate::scalar::Scalar;

/// Default bound on how deep diff and merge recurse below the root record.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// One step from a composite node to one of its children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Record field identifier.
    Field(FieldId),
    /// Sequence position.
    Position(usize),
    /// Dictionary key.
    Key(Scalar),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(id) => write!(f, ".{id}"),
            Self::Position(pos) => write!(f, "[{pos}]"),
            Self::Key(key) => write!(f, "{{{key}}}"),
        }
    }
}

/// Location of a slot inside a linearized tree, relative to the root record.
///
/// Engines push and pop segments while they recurse, so a path is only
/// materialized (cloned) when an error needs to report it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    /// The root path (empty).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Depth below the root record.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Return a copy of this path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for ValuePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}
