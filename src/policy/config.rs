use super::types::{Audit, Protection, QueryDefaults};
use crate::adapters::ProtectedComponents;

/// Policy governs destroy protection, query defaults and fact redaction.
///
/// Grouped fields provide clearer ownership and ergonomics.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub protection: Protection,
    pub query: QueryDefaults,
    pub audit: Audit,
}

impl Policy {
    /// Construct a Policy with no protected namespace regions.
    ///
    /// Intended for test pools and tooling that manages its own internal
    /// datasets; every other knob keeps its default.
    ///
    /// # Example
    /// ```rust
    /// use zfs_resource::policy::Policy;
    ///
    /// let policy = Policy::permissive();
    /// assert!(policy.protection.components.is_empty());
    /// ```
    #[must_use]
    pub fn permissive() -> Self {
        let mut p = Self::default();
        p.protection.components.clear();
        p
    }

    /// Construct a Policy whose facts are redacted for deterministic
    /// comparison (timestamps zeroed, volatile fields dropped).
    #[must_use]
    pub fn deterministic() -> Self {
        let mut p = Self::default();
        p.audit.redact = true;
        p
    }

    /// Internal-path predicate derived from `protection`.
    #[must_use]
    pub fn protected_components(&self) -> ProtectedComponents {
        ProtectedComponents::new(self.protection.components.iter().cloned())
    }
}
