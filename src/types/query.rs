use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Which properties a query should return.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PropertySelection {
    /// The policy's default property set.
    #[default]
    Default,
    /// No properties at all (names only).
    Nothing,
    Named(Vec<String>),
}

/// Caller-supplied query parameters.
#[derive(Clone, Debug, Default)]
pub struct QueryRequest {
    /// Datasets/volumes to query; empty means every resource.
    pub paths: Vec<String>,
    pub properties: PropertySelection,
    pub get_children: bool,
    pub get_snapshots: bool,
    pub nest_results: bool,
    /// Surface absent paths as not-found instead of omitting them.
    pub require_existing: bool,
}

impl QueryRequest {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn properties(mut self, properties: PropertySelection) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn get_children(mut self, yes: bool) -> Self {
        self.get_children = yes;
        self
    }

    #[must_use]
    pub fn get_snapshots(mut self, yes: bool) -> Self {
        self.get_snapshots = yes;
        self
    }

    #[must_use]
    pub fn nest_results(mut self, yes: bool) -> Self {
        self.nest_results = yes;
        self
    }

    #[must_use]
    pub fn require_existing(mut self, yes: bool) -> Self {
        self.require_existing = yes;
        self
    }
}

/// Flat resource record as returned by the storage engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceRecord {
    pub name: String,
    pub pool: String,
    pub properties: BTreeMap<String, Value>,
    /// Full snapshot names (`source@name`), present when snapshots were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<Vec<String>>,
}

/// Query-tree node.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceNode {
    pub name: String,
    pub pool: String,
    pub properties: BTreeMap<String, Value>,
    pub children: Vec<ResourceNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<Vec<String>>,
}

impl From<ResourceRecord> for ResourceNode {
    fn from(r: ResourceRecord) -> Self {
        Self {
            name: r.name,
            pool: r.pool,
            properties: r.properties,
            children: Vec::new(),
            snapshots: r.snapshots,
        }
    }
}

impl ResourceNode {
    pub fn is_pool_root(&self) -> bool {
        self.name == self.pool
    }

    /// Depth-first search for a node by name.
    pub fn find(&self, name: &str) -> Option<&ResourceNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Flat(Vec<ResourceRecord>),
    Nested(Vec<ResourceNode>),
}

impl QueryResult {
    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Flat(v) => v.len(),
            QueryResult::Nested(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_flat(self) -> Option<Vec<ResourceRecord>> {
        match self {
            QueryResult::Flat(v) => Some(v),
            QueryResult::Nested(_) => None,
        }
    }

    pub fn into_nested(self) -> Option<Vec<ResourceNode>> {
        match self {
            QueryResult::Nested(v) => Some(v),
            QueryResult::Flat(_) => None,
        }
    }
}
