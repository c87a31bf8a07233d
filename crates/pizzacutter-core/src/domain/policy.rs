//! Copy / overwrite / outside-write decisions for one template object.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::domain::value_objects::{OptionMarkers, OptionRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The source path carries the no-copy marker.
    NoCopy,
    /// The target lies outside the target root and outside writes are off.
    OutsideTarget,
    /// The source path carries the no-overwrite marker and the target exists.
    NoOverwrite,
    /// The target exists and overwriting is off.
    ExistingTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoCopy => "marked no-copy",
            Self::OutsideTarget => "outside the target root",
            Self::NoOverwrite => "marked no-overwrite",
            Self::ExistingTarget => "target exists and overwrite is disabled",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Proceed { overwrite: bool },
}

impl Decision {
    pub fn is_skip(self) -> bool {
        matches!(self, Self::Skip(_))
    }
}

pub struct CopyPolicy<'a> {
    markers: &'a OptionMarkers,
    target_root: &'a Path,
    allow_overwrite: bool,
    allow_outside_write: bool,
}

impl<'a> CopyPolicy<'a> {
    pub fn new(
        markers: &'a OptionMarkers,
        target_root: &'a Path,
        allow_overwrite: bool,
        allow_outside_write: bool,
    ) -> Self {
        Self {
            markers,
            target_root,
            allow_overwrite,
            allow_outside_write,
        }
    }

    /// Substring check on the whole source path, so descendants of a marked
    /// directory are covered too.
    pub fn is_no_copy(&self, source: &Path) -> bool {
        self.markers
            .is_marked(OptionRole::ObjectNoCopy, &source.to_string_lossy())
    }

    pub fn is_outside_target(&self, target: &Path) -> bool {
        !target.starts_with(self.target_root)
    }

    /// Decisions that hold regardless of what exists on disk. Objects skipped
    /// here are also left out of content rewriting and auditing.
    pub fn precheck(&self, source: &Path, target: &Path) -> Option<SkipReason> {
        if self.is_no_copy(source) {
            return Some(SkipReason::NoCopy);
        }
        if self.is_outside_target(target) && !self.allow_outside_write {
            return Some(SkipReason::OutsideTarget);
        }
        None
    }

    pub fn decide(&self, source: &Path, target: &Path, target_exists: bool) -> Decision {
        if let Some(reason) = self.precheck(source, target) {
            return Decision::Skip(reason);
        }
        if !target_exists {
            return Decision::Proceed { overwrite: false };
        }
        if self
            .markers
            .is_marked(OptionRole::ObjectNoOverwrite, &source.to_string_lossy())
        {
            return Decision::Skip(SkipReason::NoOverwrite);
        }
        if self.allow_overwrite {
            Decision::Proceed { overwrite: true }
        } else {
            Decision::Skip(SkipReason::ExistingTarget)
        }
    }
}
