use crate::constants::{DEFAULT_PROTECTED_COMPONENTS, DEFAULT_QUERY_PROPERTIES};

/// Which namespace regions are protected from destroy without an explicit
/// `allow_internal` override.
#[derive(Clone, Debug)]
pub struct Protection {
    /// Dataset name components that mark a path as internal.
    pub components: Vec<String>,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            components: DEFAULT_PROTECTED_COMPONENTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct QueryDefaults {
    /// Properties returned when a query does not name any.
    pub properties: Vec<String>,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            properties: DEFAULT_QUERY_PROPERTIES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Facts redaction knobs.
#[derive(Clone, Debug, Default)]
pub struct Audit {
    /// Zero timestamps and strip volatile fields from every emitted fact.
    pub redact: bool,
}
