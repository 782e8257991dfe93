use super::is_descendant;

/// A path together with every other input path strictly below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestryGroup {
    pub ancestor: String,
    pub descendants: Vec<String>,
}

/// For each path (input order), collect the other paths that are strict
/// descendants of it. Only paths with at least one descendant are returned,
/// so an empty result means the set is pairwise non-overlapping.
#[must_use]
pub fn group_by_ancestry<S: AsRef<str>>(paths: &[S]) -> Vec<AncestryGroup> {
    let mut groups = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let descendants: Vec<String> = paths
            .iter()
            .map(|sp| sp.as_ref())
            .filter(|sp| is_descendant(sp, path))
            .map(str::to_string)
            .collect();
        if !descendants.is_empty() {
            groups.push(AncestryGroup {
                ancestor: path.to_string(),
                descendants,
            });
        }
    }
    groups
}
