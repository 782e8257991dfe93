use std::fmt;

use serde::{Serialize, Serializer};

use super::errors::{Error, ErrorKind, Result};
use crate::adapters::InternalPathPredicate;
use crate::constants::{BOOKMARK_SEP, PATH_SEP, SNAPSHOT_SEP, SNAPSHOT_WILDCARD};

/// Snapshot selector on the right-hand side of `@`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotName {
    Literal(String),
    Wildcard,
}

impl SnapshotName {
    fn parse(name: &str) -> Self {
        if name == SNAPSHOT_WILDCARD {
            SnapshotName::Wildcard
        } else {
            SnapshotName::Literal(name.to_string())
        }
    }

    /// The literal name, or `None` for the wildcard.
    pub fn literal(&self) -> Option<&str> {
        match self {
            SnapshotName::Literal(n) => Some(n),
            SnapshotName::Wildcard => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, SnapshotName::Wildcard)
    }
}

impl fmt::Display for SnapshotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotName::Literal(n) => f.write_str(n),
            SnapshotName::Wildcard => f.write_str(SNAPSHOT_WILDCARD),
        }
    }
}

impl Serialize for SnapshotName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Flags that change what the classifier accepts.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassifyOptions {
    pub recursive: bool,
    pub allow_internal: bool,
}

/// A validated reference to a dataset/volume or to snapshot(s) of one.
///
/// Only constructed through [`ResourcePath::classify`], so a value of this
/// type never carries bookmark syntax, a leading/trailing `/`, an empty source
/// or more than one `@`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourcePath {
    Dataset { name: String },
    Snapshot { source: String, snapshot: SnapshotName },
}

impl ResourcePath {
    /// Parse and validate a raw caller-supplied path.
    ///
    /// # Errors
    /// Returns an `InvalidPath`, `Unsupported` or `Protected` error describing
    /// the first rule the input violates.
    pub fn classify(
        raw: &str,
        opts: ClassifyOptions,
        internal: &dyn InternalPathPredicate,
    ) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::new(ErrorKind::InvalidPath, "path may not be empty"));
        }
        if raw.starts_with(PATH_SEP) || raw.ends_with(PATH_SEP) {
            return Err(Error::new(
                ErrorKind::InvalidPath,
                format!("'{raw}' may not begin or end with / character"),
            ));
        }
        if raw.contains(BOOKMARK_SEP) {
            return Err(Error::new(
                ErrorKind::Unsupported,
                "Destroying bookmarks is unsupported at this time",
            ));
        }
        if !raw.contains(PATH_SEP) {
            if !raw.contains(SNAPSHOT_SEP) {
                return Err(Error::new(
                    ErrorKind::Unsupported,
                    "Destroying zpools is not allowed",
                ));
            }
            if opts.recursive {
                return Err(Error::new(
                    ErrorKind::Unsupported,
                    "Recursively destroying snapshots at root of zpool is not allowed",
                ));
            }
        }

        let parsed = match raw.split_once(SNAPSHOT_SEP) {
            None => ResourcePath::Dataset {
                name: raw.to_string(),
            },
            Some((source, name)) => {
                if name.contains(SNAPSHOT_SEP) {
                    return Err(Error::new(
                        ErrorKind::InvalidPath,
                        format!("Only one @ character is allowed in '{raw}'"),
                    ));
                }
                if source.trim().is_empty() {
                    return Err(Error::new(
                        ErrorKind::InvalidPath,
                        format!("Missing filesystem or volume name in '{raw}'"),
                    ));
                }
                if name.trim().is_empty() {
                    return Err(Error::new(
                        ErrorKind::InvalidPath,
                        format!("Missing snapshot name in '{raw}'"),
                    ));
                }
                ResourcePath::Snapshot {
                    source: source.to_string(),
                    snapshot: SnapshotName::parse(name),
                }
            }
        };

        if !opts.allow_internal && internal.is_protected(raw) {
            return Err(Error::new(
                ErrorKind::Protected,
                format!("'{raw}' is a protected path and may not be destroyed"),
            ));
        }
        Ok(parsed)
    }

    /// Dataset/volume this path refers to (the snapshot source for snapshots).
    pub fn source(&self) -> &str {
        match self {
            ResourcePath::Dataset { name } => name,
            ResourcePath::Snapshot { source, .. } => source,
        }
    }

    /// Pool (first component) owning this path.
    pub fn pool(&self) -> &str {
        pool_of(self.source())
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, ResourcePath::Snapshot { .. })
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourcePath::Dataset { name } => f.write_str(name),
            ResourcePath::Snapshot { source, snapshot } => write!(f, "{source}@{snapshot}"),
        }
    }
}

/// Return the pool component of a dataset name (`tank/a/b` -> `tank`).
pub fn pool_of(name: &str) -> &str {
    name.split(PATH_SEP).next().unwrap_or(name)
}
