//! In-memory `StorageEngine` used by tests and as a reference adapter.
//!
//! Models just enough of a dataset namespace to exercise the destroy and query
//! paths: mount state, busy unmounts, refusal to destroy a dataset that still
//! has children, atomic bulk programs and batched snapshot destruction. Every
//! call is journaled and failures can be injected per operation and name.
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};

use super::engine::{BulkArgs, EngineError, EngineQuery, EngineResult, Resource, StorageEngine};
use crate::constants::SNAPSHOT_SEP;
use crate::namespace::{ancestors, is_descendant};
use crate::types::path::pool_of;
use crate::types::plan::BulkOperation;
use crate::types::query::ResourceRecord;

/// Engine entry points that can have failures injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Open,
    Unmount,
    Destroy,
    DestroySnapshots,
    Bulk,
    Query,
}

/// Journal entry for one engine call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCall {
    Open(String),
    Unmount {
        name: String,
        force: bool,
        recursive: bool,
    },
    Destroy(String),
    DestroySnapshots(Vec<String>),
    Bulk {
        pool: String,
        op: BulkOperation,
        args: BulkArgs,
    },
    Query(EngineQuery),
}

#[derive(Clone, Debug)]
struct MemDataset {
    mounted: bool,
    properties: BTreeMap<String, Value>,
    snapshots: Vec<String>,
}

impl Default for MemDataset {
    fn default() -> Self {
        Self {
            mounted: true,
            properties: BTreeMap::new(),
            snapshots: Vec::new(),
        }
    }
}

#[derive(Default)]
struct MemState {
    datasets: BTreeMap<String, MemDataset>,
    failures: HashMap<(EngineOp, String), EngineError>,
    calls: Vec<EngineCall>,
}

impl MemState {
    fn injected(&self, op: EngineOp, name: &str) -> EngineResult<()> {
        match self.failures.get(&(op, name.to_string())) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn descendants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.datasets.keys().filter(move |k| is_descendant(k, name))
    }

    fn record(&self, name: &str, properties: Option<&[String]>, get_snapshots: bool) -> Option<ResourceRecord> {
        let ds = self.datasets.get(name)?;
        let mut props = BTreeMap::new();
        if let Some(wanted) = properties {
            for key in wanted {
                if key == "mounted" {
                    props.insert(key.clone(), json!(ds.mounted));
                } else if let Some(v) = ds.properties.get(key) {
                    props.insert(key.clone(), v.clone());
                }
            }
        }
        Some(ResourceRecord {
            name: name.to_string(),
            pool: pool_of(name).to_string(),
            properties: props,
            snapshots: get_snapshots.then(|| {
                ds.snapshots
                    .iter()
                    .map(|s| format!("{name}@{s}"))
                    .collect()
            }),
        })
    }
}

#[derive(Default)]
pub struct MemoryEngine {
    state: Mutex<MemState>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a mounted dataset, creating missing ancestors as well.
    #[must_use]
    pub fn with_dataset(self, name: &str) -> Self {
        {
            let mut st = self.lock();
            let mut chain: Vec<&str> = ancestors(name).collect();
            chain.reverse();
            chain.push(name);
            for n in chain {
                st.datasets.entry(n.to_string()).or_default();
            }
        }
        self
    }

    /// Add a snapshot (`dataset@name`), creating the dataset if needed.
    #[must_use]
    pub fn with_snapshot(self, full: &str) -> Self {
        let Some((ds, snap)) = full.split_once(SNAPSHOT_SEP) else {
            return self;
        };
        let this = self.with_dataset(ds);
        {
            let mut st = this.lock();
            if let Some(d) = st.datasets.get_mut(ds) {
                if !d.snapshots.iter().any(|s| s == snap) {
                    d.snapshots.push(snap.to_string());
                }
            }
        }
        this
    }

    #[must_use]
    pub fn with_property(self, name: &str, key: &str, value: Value) -> Self {
        {
            let mut st = self.lock();
            if let Some(d) = st.datasets.get_mut(name) {
                d.properties.insert(key.to_string(), value);
            }
        }
        self
    }

    #[must_use]
    pub fn with_unmounted(self, name: &str) -> Self {
        {
            let mut st = self.lock();
            if let Some(d) = st.datasets.get_mut(name) {
                d.mounted = false;
            }
        }
        self
    }

    /// Make `op` fail with `err` whenever it targets `name`.
    pub fn fail(&self, op: EngineOp, name: &str, err: EngineError) {
        self.lock().failures.insert((op, name.to_string()), err);
    }

    pub fn exists(&self, name: &str) -> bool {
        self.lock().datasets.contains_key(name)
    }

    pub fn is_mounted(&self, name: &str) -> bool {
        self.lock().datasets.get(name).is_some_and(|d| d.mounted)
    }

    /// Bare snapshot names of `name`, in creation order.
    pub fn snapshots_of(&self, name: &str) -> Vec<String> {
        self.lock()
            .datasets
            .get(name)
            .map(|d| d.snapshots.clone())
            .unwrap_or_default()
    }

    pub fn dataset_names(&self) -> Vec<String> {
        self.lock().datasets.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

struct MemResource<'a> {
    engine: &'a MemoryEngine,
    name: String,
}

impl Resource for MemResource<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn unmount(&self, force: bool, recursive: bool) -> EngineResult<()> {
        let mut st = self.engine.lock();
        st.calls.push(EngineCall::Unmount {
            name: self.name.clone(),
            force,
            recursive,
        });
        st.injected(EngineOp::Unmount, &self.name)?;
        if !st.datasets.contains_key(&self.name) {
            return Err(EngineError::not_found(format!(
                "cannot open '{}': dataset does not exist",
                self.name
            )));
        }
        let children: Vec<String> = st.descendants(&self.name).cloned().collect();
        if !recursive && children.iter().any(|c| st.datasets[c].mounted) {
            return Err(EngineError::busy(format!(
                "cannot unmount '{}': pool or dataset is busy",
                self.name
            )));
        }
        if recursive {
            for c in &children {
                if let Some(d) = st.datasets.get_mut(c) {
                    d.mounted = false;
                }
            }
        }
        if let Some(d) = st.datasets.get_mut(&self.name) {
            d.mounted = false;
        }
        Ok(())
    }

    fn destroy(self: Box<Self>) -> EngineResult<()> {
        let mut st = self.engine.lock();
        st.calls.push(EngineCall::Destroy(self.name.clone()));
        st.injected(EngineOp::Destroy, &self.name)?;
        if st.descendants(&self.name).next().is_some() {
            return Err(EngineError::other(format!(
                "cannot destroy '{}': filesystem has children",
                self.name
            )));
        }
        match st.datasets.remove(&self.name) {
            Some(_) => Ok(()),
            None => Err(EngineError::not_found(format!(
                "cannot destroy '{}': dataset does not exist",
                self.name
            ))),
        }
    }
}

impl StorageEngine for MemoryEngine {
    fn open_resource(&self, name: &str) -> EngineResult<Box<dyn Resource + '_>> {
        let mut st = self.lock();
        st.calls.push(EngineCall::Open(name.to_string()));
        st.injected(EngineOp::Open, name)?;
        if !st.datasets.contains_key(name) {
            return Err(EngineError::not_found(format!(
                "cannot open '{name}': dataset does not exist"
            )));
        }
        Ok(Box::new(MemResource {
            engine: self,
            name: name.to_string(),
        }))
    }

    fn destroy_snapshots(&self, names: &[String]) -> EngineResult<()> {
        let mut st = self.lock();
        st.calls.push(EngineCall::DestroySnapshots(names.to_vec()));
        let mut parsed = Vec::with_capacity(names.len());
        for full in names {
            st.injected(EngineOp::DestroySnapshots, full)?;
            match full.split_once(SNAPSHOT_SEP) {
                Some((ds, snap)) => parsed.push((ds.to_string(), snap.to_string())),
                None => {
                    return Err(EngineError::other(format!(
                        "'{full}' is not a snapshot name"
                    )))
                }
            }
        }
        // missing snapshots are skipped, matching the kernel's batch semantics
        for (ds, snap) in parsed {
            if let Some(d) = st.datasets.get_mut(&ds) {
                d.snapshots.retain(|s| *s != snap);
            }
        }
        Ok(())
    }

    fn run_bulk_program(&self, pool: &str, op: BulkOperation, args: &BulkArgs) -> EngineResult<()> {
        let mut st = self.lock();
        st.calls.push(EngineCall::Bulk {
            pool: pool.to_string(),
            op,
            args: args.clone(),
        });
        st.injected(EngineOp::Bulk, &args.target)?;
        if pool_of(&args.target) != pool {
            return Err(EngineError::other(format!(
                "'{}' is not in pool '{pool}'",
                args.target
            )));
        }
        if !st.datasets.contains_key(&args.target) {
            return Err(EngineError::not_found(format!(
                "'{}' does not exist",
                args.target
            )));
        }
        let children: Vec<String> = st.descendants(&args.target).cloned().collect();
        match op {
            BulkOperation::DestroySubtree => {
                if !args.recursive && !children.is_empty() {
                    return Err(EngineError::other(format!(
                        "cannot destroy '{}': filesystem has children",
                        args.target
                    )));
                }
                for c in &children {
                    st.datasets.remove(c);
                }
                st.datasets.remove(&args.target);
            }
            BulkOperation::DestroySnapshots => {
                let mut scope = vec![args.target.clone()];
                if args.recursive {
                    scope.extend(children);
                }
                for name in scope {
                    if let Some(d) = st.datasets.get_mut(&name) {
                        match &args.pattern {
                            Some(p) => d.snapshots.retain(|s| s != p),
                            None => d.snapshots.clear(),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn query(&self, q: &EngineQuery) -> EngineResult<Vec<ResourceRecord>> {
        let mut st = self.lock();
        st.calls.push(EngineCall::Query(q.clone()));
        for p in &q.paths {
            st.injected(EngineOp::Query, p)?;
        }
        let mut names: Vec<String> = Vec::new();
        if q.paths.is_empty() {
            names.extend(st.datasets.keys().cloned());
        } else {
            for p in &q.paths {
                if st.datasets.contains_key(p) && !names.contains(p) {
                    names.push(p.clone());
                }
                if q.get_children {
                    for c in st.descendants(p) {
                        if !names.contains(c) {
                            names.push(c.clone());
                        }
                    }
                }
            }
        }
        Ok(names
            .iter()
            .filter_map(|n| st.record(n, q.properties.as_deref(), q.get_snapshots))
            .collect())
    }
}
