//! Shared crate-wide constants for zfs-resource.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Subsystem label attached to every emitted fact.
pub const SUBSYSTEM: &str = "zfs.resource";

/// UUIDv5 namespace tag for deterministic plan/step IDs.
pub const NS_TAG: &str = "https://zfs-resource/destroy-plan";

/// Snapshot name that selects every snapshot of a source (and, when recursive,
/// of its descendants).
pub const SNAPSHOT_WILDCARD: &str = "*";

/// Dataset path component separator.
pub const PATH_SEP: char = '/';

/// Separator between a dataset and a snapshot name.
pub const SNAPSHOT_SEP: char = '@';

/// Separator between a dataset and a bookmark name. Bookmarks are rejected.
pub const BOOKMARK_SEP: char = '#';

/// Dataset name components reserved for middleware-managed state. A path that
/// contains any of these as a component is protected unless the caller opts in.
pub const DEFAULT_PROTECTED_COMPONENTS: &[&str] = &[
    ".system",
    ".ix-virt",
    "ix-apps",
    "ix-applications",
];

/// Properties returned by `query` when the caller does not choose any.
pub const DEFAULT_QUERY_PROPERTIES: &[&str] = &[
    "type",
    "mounted",
    "mountpoint",
    "used",
    "available",
    "compression",
    "readonly",
];
