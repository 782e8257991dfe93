//! Hierarchy helpers over `/`-delimited dataset names.
//!
//! - `ancestry`: detects ancestor/descendant overlap inside a path set.
//! - `nest`: assembles flat query records into a tree.
//!
//! Relationships are by whole path component, never by substring:
//! `tank/ab` is not a descendant of `tank/a`.

pub mod ancestry;
pub mod nest;

pub use ancestry::{group_by_ancestry, AncestryGroup};
pub use nest::nest;

use crate::constants::PATH_SEP;

/// True when `candidate` lies strictly below `ancestor`.
#[must_use]
pub fn is_descendant(candidate: &str, ancestor: &str) -> bool {
    candidate
        .strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with(PATH_SEP))
}

/// Ancestors of `name`, nearest first (`tank/a/b` yields `tank/a`, `tank`).
pub fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    let mut cur = name;
    std::iter::from_fn(move || {
        let (parent, _) = cur.rsplit_once(PATH_SEP)?;
        cur = parent;
        Some(parent)
    })
}
