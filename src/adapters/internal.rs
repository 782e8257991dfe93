use crate::constants::{PATH_SEP, SNAPSHOT_SEP};

/// Decides whether a path belongs to a protected, middleware-managed region
/// of the namespace.
pub trait InternalPathPredicate: Send + Sync {
    fn is_protected(&self, path: &str) -> bool;
}

impl<F> InternalPathPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_protected(&self, path: &str) -> bool {
        self(path)
    }
}

/// Protects any path whose dataset portion has one of the configured names as
/// a component (`tank/.system/cores` is protected by `.system`).
#[derive(Clone, Debug, Default)]
pub struct ProtectedComponents {
    components: Vec<String>,
}

impl ProtectedComponents {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }
}

impl InternalPathPredicate for ProtectedComponents {
    fn is_protected(&self, path: &str) -> bool {
        let dataset = path.split(SNAPSHOT_SEP).next().unwrap_or(path);
        dataset
            .split(PATH_SEP)
            .any(|c| self.components.iter().any(|p| p == c))
    }
}
